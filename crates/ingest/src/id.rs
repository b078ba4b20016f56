//! Event identifier generation.
//!
//! Identifiers look like `evt_<millis>_<random>`, both parts lowercase
//! base-36. The millisecond prefix keeps ids from different process lifetimes
//! apart; the 8-character random suffix (about 41 bits) separates ids minted
//! in the same millisecond. They are unique, not secret.
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

const PREFIX: &str = "evt_";
const RANDOM_LEN: usize = 8;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of event identifiers.
///
/// The server holds one behind an `Arc` and calls it once per accepted event.
pub trait EventIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Default generator: wall-clock milliseconds plus a random suffix.
///
/// ```rust
/// use ingest::{is_event_id, EventIdGenerator, TimeRandomIdGenerator};
///
/// let id = TimeRandomIdGenerator.next_id();
/// assert!(is_event_id(&id));
/// assert_ne!(id, TimeRandomIdGenerator.next_id());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRandomIdGenerator;

impl EventIdGenerator for TimeRandomIdGenerator {
    fn next_id(&self) -> String {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let random = Uuid::new_v4().as_u64_pair().1;
        let bound = 36u64.pow(RANDOM_LEN as u32);

        let mut suffix = to_base36(random % bound);
        while suffix.len() < RANDOM_LEN {
            suffix.insert(0, '0');
        }
        format!("{PREFIX}{}_{suffix}", to_base36(millis))
    }
}

/// Deterministic generator for tests: `evt_seq_00000001`, `evt_seq_00000002`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventIdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{PREFIX}seq_{n:08}")
    }
}

/// Returns true if `id` has the `evt_<base36>_<8 x base36>` shape.
pub fn is_event_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix(PREFIX) else {
        return false;
    };
    let Some((stamp, random)) = rest.split_once('_') else {
        return false;
    };
    !stamp.is_empty()
        && stamp.bytes().all(is_base36)
        && random.len() == RANDOM_LEN
        && random.bytes().all(is_base36)
}

fn is_base36(b: u8) -> bool {
    b.is_ascii_digit() || b.is_ascii_lowercase()
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        let id = TimeRandomIdGenerator.next_id();
        assert!(id.starts_with("evt_"));
        assert!(is_event_id(&id), "{id}");
    }

    #[test]
    fn shape_check_rejects_malformed_ids() {
        for bad in [
            "",
            "evt_",
            "evt_abc",
            "evt__abcdefgh",
            "evt_abc_abcdefg",
            "evt_abc_ABCDEFGH",
            "evt_abc_abcdefghi",
            "id_abc_abcdefgh",
        ] {
            assert!(!is_event_id(bad), "{bad}");
        }
        assert!(is_event_id("evt_loyw3v28_0a1b2c3d"));
    }

    #[test]
    fn ids_unique_across_threads() {
        let generator = Arc::new(TimeRandomIdGenerator);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || (0..500).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate event id");
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    #[test]
    fn sequential_generator_is_deterministic() {
        let generator = SequentialIdGenerator::new();
        assert_eq!(generator.next_id(), "evt_seq_00000001");
        assert_eq!(generator.next_id(), "evt_seq_00000002");
        assert!(is_event_id("evt_seq_00000003"));
    }
}
