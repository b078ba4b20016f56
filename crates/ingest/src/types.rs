//! Core data model types for the ingest crate.
//!
//! ```text
//! serde_json::Value (untrusted body)
//!         │
//!         ▼ validate()
//! ValidationResult { valid, errors }
//!         │ valid
//!         ▼ enrich()
//! EventSubmission (typed view of the payload)
//! ├── event_type: String
//! ├── source: String
//! ├── priority: Option<Priority>
//! └── data: Option<Map>
//!         │
//!         ▼
//! EnrichedEvent
//! ├── event_id: String (generated)
//! ├── received_at: DateTime<Utc> (enrichment instant)
//! ├── ingestion_request_id: String (from RequestContext)
//! ├── event_type / source (verbatim)
//! ├── priority: Priority (default Normal)
//! ├── data: Map (default {})
//! └── metadata: EventMetadata
//! ```
//!
//! Wire names are camelCase to match the HTTP contract.
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Event priority. Absent priorities default to [`Priority::Normal`].
///
/// ```rust
/// use ingest::Priority;
///
/// assert_eq!("critical".parse::<Priority>().unwrap(), Priority::Critical);
/// assert!("urgent".parse::<Priority>().is_err());
/// assert_eq!(Priority::default(), Priority::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    /// Every accepted priority, in ascending order.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Comma-separated list of accepted names, used in validation messages.
    pub fn expected_values() -> String {
        Self::ALL
            .iter()
            .map(Priority::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the accepted priority names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority `{0}`")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}

/// Verdict produced by [`validate`](crate::validate).
///
/// `is_valid()` is true exactly when `errors()` is empty; the constructor
/// derives one from the other so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Violation descriptions in rule order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Typed view of a payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSubmission {
    pub event_type: String,
    pub source: String,
    pub priority: Option<Priority>,
    pub data: Option<Map<String, Value>>,
}

/// Per-invocation context supplied by the execution host.
///
/// The correlation id and cold-start flag are decided outside the core;
/// `started_at` anchors `processingTimeMs`.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub cold_start: bool,
    pub started_at: Instant,
}

impl RequestContext {
    /// Creates a context whose clock starts now.
    pub fn new(request_id: impl Into<String>, cold_start: bool) -> Self {
        Self {
            request_id: request_id.into(),
            cold_start,
            started_at: Instant::now(),
        }
    }
}

/// Deployment tags supplied by the surrounding environment.
///
/// `stage` and `function_version` are copied into every [`EventMetadata`];
/// `function_name` labels log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTags {
    pub function_name: String,
    pub stage: String,
    pub function_version: String,
}

/// Processing metadata attached during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub stage: String,
    pub function_version: String,
    pub cold_start: bool,
    pub processing_time_ms: u64,
}

/// The normalized, system-stamped record derived from a validated payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    pub event_id: String,
    #[serde(with = "crate::serde_iso")]
    pub received_at: DateTime<Utc>,
    pub ingestion_request_id: String,
    pub event_type: String,
    pub source: String,
    pub priority: Priority,
    pub data: Map<String, Value>,
    pub metadata: EventMetadata,
}
