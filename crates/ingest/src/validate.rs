//! Payload validation.
//!
//! Rules run in a fixed order and every rule runs, so one request reports
//! all of its problems at once:
//!
//! ```text
//! payload absent / null ──► ["request body is required"]   (stops here)
//!        │
//!        ▼
//! ┌──────────────────────────────────────┐
//! │ 1. eventType  required, string, 1..=N │
//! │ 2. source     required, string, ≤ N   │
//! │ 3. data       optional, object, ≤ B   │
//! │ 4. priority   optional, enum          │
//! └──────────────────────────────────────┘
//!        │
//!        ▼
//! ValidationResult { valid, errors }
//! ```
//!
//! A `null` field counts as absent. Lengths are counted in characters.
use serde_json::Value;

use crate::config::IngestConfig;
use crate::types::{Priority, ValidationResult};

pub(crate) const BODY_REQUIRED: &str = "request body is required";

/// Checks a raw payload against the event schema.
///
/// Pure: the result depends only on `payload` and `cfg`.
///
/// ```rust
/// use ingest::{validate, IngestConfig};
/// use serde_json::json;
///
/// let cfg = IngestConfig::default();
///
/// let ok = validate(Some(&json!({"eventType": "order.created", "source": "web"})), &cfg);
/// assert!(ok.is_valid());
///
/// let bad = validate(Some(&json!({"source": "web", "priority": "urgent"})), &cfg);
/// assert_eq!(
///     bad.errors(),
///     ["eventType is required", "priority must be one of: low, normal, high, critical"]
/// );
///
/// let empty = validate(None, &cfg);
/// assert_eq!(empty.errors(), ["request body is required"]);
/// ```
pub fn validate(payload: Option<&Value>, cfg: &IngestConfig) -> ValidationResult {
    let Some(payload) = payload.filter(|value| !value.is_null()) else {
        return ValidationResult::from_errors(vec![BODY_REQUIRED.to_string()]);
    };

    let mut errors = Vec::new();
    check_event_type(field(payload, "eventType"), cfg, &mut errors);
    check_source(field(payload, "source"), cfg, &mut errors);
    check_data(field(payload, "data"), cfg, &mut errors);
    check_priority(field(payload, "priority"), &mut errors);

    ValidationResult::from_errors(errors)
}

/// Looks up a field, treating non-object payloads and `null` values as absent.
pub(crate) fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload
        .as_object()
        .and_then(|fields| fields.get(name))
        .filter(|value| !value.is_null())
}

fn check_event_type(value: Option<&Value>, cfg: &IngestConfig, errors: &mut Vec<String>) {
    match value {
        None => errors.push("eventType is required".to_string()),
        Some(Value::String(s)) => {
            let len = s.chars().count();
            if len < 1 || len > cfg.max_event_type_length {
                errors.push(format!(
                    "eventType must be between 1 and {} characters",
                    cfg.max_event_type_length
                ));
            }
        }
        Some(_) => errors.push("eventType must be a string".to_string()),
    }
}

fn check_source(value: Option<&Value>, cfg: &IngestConfig, errors: &mut Vec<String>) {
    match value {
        None => errors.push("source is required".to_string()),
        Some(Value::String(s)) if s.is_empty() => errors.push("source is required".to_string()),
        Some(Value::String(s)) => {
            if let Some(limit) = cfg.max_source_length {
                if s.chars().count() > limit {
                    errors.push(format!("source must be at most {limit} characters"));
                }
            }
        }
        Some(_) => errors.push("source must be a string".to_string()),
    }
}

fn check_data(value: Option<&Value>, cfg: &IngestConfig, errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };
    if !value.is_object() {
        errors.push("data must be an object".to_string());
        return;
    }
    if let Some(limit) = cfg.max_data_bytes {
        // Value serialization only fails on non-string map keys, which
        // serde_json::Value cannot hold.
        let size = serde_json::to_vec(value).map_or(usize::MAX, |bytes| bytes.len());
        if size > limit {
            errors.push(format!("data must not exceed {limit} bytes"));
        }
    }
}

fn check_priority(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };
    let known = value
        .as_str()
        .is_some_and(|s| s.parse::<Priority>().is_ok());
    if !known {
        errors.push(format!(
            "priority must be one of: {}",
            Priority::expected_values()
        ));
    }
}
