//! Configuration types for the ingest pipeline.
//!
//! [`IngestConfig`] carries the field limits the validator enforces. It is
//! cheap to clone and deserializes from any format the `config` crate reads,
//! so the server can load it from a file or environment variables.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default configuration is valid");
//! assert_eq!(config.max_event_type_length, 100);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event type length bound from the shared limits table.
pub const MAX_EVENT_TYPE_LENGTH: usize = 100;

/// Source length bound from the shared limits table.
pub const MAX_SOURCE_LENGTH: usize = 100;

/// Maximum serialized size of the `data` object (256 KiB).
pub const MAX_DATA_BYTES: usize = 256 * 1024;

/// Runtime configuration for validation limits.
///
/// # Serialization
///
/// ```json
/// {
///   "max_event_type_length": 100,
///   "max_source_length": 100,
///   "max_data_bytes": 262144
/// }
/// ```
///
/// Setting `max_source_length` or `max_data_bytes` to `null` disables that
/// check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Upper bound (inclusive, in characters) for `eventType`.
    ///
    /// The lower bound is always 1.
    ///
    /// Default: `100`
    pub max_event_type_length: usize,

    /// Upper bound (inclusive, in characters) for `source`.
    ///
    /// Default: `Some(100)`
    pub max_source_length: Option<usize>,

    /// Upper bound for the JSON-serialized byte length of `data`.
    ///
    /// Default: `Some(262144)`
    pub max_data_bytes: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_event_type_length: MAX_EVENT_TYPE_LENGTH,
            max_source_length: Some(MAX_SOURCE_LENGTH),
            max_data_bytes: Some(MAX_DATA_BYTES),
        }
    }
}

impl IngestConfig {
    /// Validates the configuration for internal consistency.
    ///
    /// Call this once at startup; a zero limit would reject every event.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidLimit`] if any configured limit is zero
    ///
    /// ```rust
    /// use ingest::{ConfigError, IngestConfig};
    ///
    /// let config = IngestConfig {
    ///     max_event_type_length: 0,
    ///     ..Default::default()
    /// };
    /// assert!(matches!(config.validate(), Err(ConfigError::InvalidLimit { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_event_type_length == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "max_event_type_length",
            });
        }
        if self.max_source_length == Some(0) {
            return Err(ConfigError::InvalidLimit {
                field: "max_source_length",
            });
        }
        if self.max_data_bytes == Some(0) {
            return Err(ConfigError::InvalidLimit {
                field: "max_data_bytes",
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A limit was configured as zero.
    #[error("{field} must be greater than zero")]
    InvalidLimit { field: &'static str },
}
