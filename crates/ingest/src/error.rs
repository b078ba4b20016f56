//! Error types produced by the ingest crate.
//!
//! Validation failures are not errors here: [`validate`](crate::validate)
//! always returns a [`ValidationResult`](crate::ValidationResult) verdict.
//! [`IngestError`] covers the exceptional paths, which callers at the HTTP
//! boundary turn into an internal-fault response.
//!
//! | Error | Raised by | Meaning |
//! |-------|-----------|---------|
//! | [`Unvalidated`](IngestError::Unvalidated) | [`enrich`](crate::enrich) | Payload did not satisfy the validation precondition |
//! | [`Serialization`](IngestError::Serialization) | [`EventSink`](crate::EventSink) impls | Enriched event could not be encoded |
use thiserror::Error;

/// Errors that can occur while enriching or handing off an event.
///
/// Enrichment cannot fail for a payload that passed [`validate`](crate::validate),
/// so seeing one of these means a caller skipped a step.
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::Unvalidated("eventType is missing".to_string());
/// assert!(err.to_string().contains("eventType is missing"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The payload handed to the enricher has not passed validation.
    #[error("payload has not passed validation: {0}")]
    Unvalidated(String),

    /// The enriched event could not be serialized for hand-off.
    #[error("failed to serialize enriched event: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Serialization(err.to_string())
    }
}

/// Why [`ingest`](crate::ingest) did not produce an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestRejection {
    /// The payload failed validation; carries the violations in rule order.
    #[error("validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// An exceptional failure after validation passed.
    #[error(transparent)]
    Fault(#[from] IngestError),
}
