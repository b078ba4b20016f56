//! EventFlow Ingest Layer
//!
//! This is where submitted events enter EventFlow. A raw JSON payload is
//! checked against the event schema, then stamped with identity and timing
//! metadata to produce an [`EnrichedEvent`].
//!
//! ## What we do here
//!
//! - **Validate** - [`validate`] reports every schema violation in a fixed
//!   field order instead of stopping at the first one.
//! - **Enrich** - [`enrich`] generates an event id, captures the receipt
//!   time, defaults `priority` and `data`, and attaches processing metadata.
//! - **Hand off** - [`EventSink`] is the seam for whatever consumes accepted
//!   events next.
//! - **Log** - [`ingest`] emits one structured line per outcome.
//!
//! Nothing here performs I/O or holds state across calls; the cold-start
//! flag and correlation id arrive through [`RequestContext`].
//!
//! ## Example
//!
//! ```
//! use ingest::{ingest, IngestConfig, RequestContext, ServiceTags, TimeRandomIdGenerator};
//! use serde_json::json;
//!
//! let tags = ServiceTags {
//!     function_name: "EventIngestion".into(),
//!     stage: "dev".into(),
//!     function_version: "$LATEST".into(),
//! };
//! let ctx = RequestContext::new("req-42", false);
//! let payload = json!({"eventType": "order.created", "source": "web", "priority": "high"});
//!
//! let cfg = IngestConfig::default();
//! let event = ingest(Some(&payload), &ctx, &cfg, &tags, &TimeRandomIdGenerator).unwrap();
//! assert_eq!(event.event_type, "order.created");
//! assert_eq!(event.ingestion_request_id, "req-42");
//! ```
use serde_json::Value;
use tracing::{info, warn, Level};

mod config;
mod enrich;
mod error;
mod id;
pub mod serde_iso;
mod sink;
mod types;
mod validate;

pub use crate::config::{
    ConfigError, IngestConfig, MAX_DATA_BYTES, MAX_EVENT_TYPE_LENGTH, MAX_SOURCE_LENGTH,
};
pub use crate::enrich::{enrich, enrich_submission};
pub use crate::error::{IngestError, IngestRejection};
pub use crate::id::{is_event_id, EventIdGenerator, SequentialIdGenerator, TimeRandomIdGenerator};
pub use crate::sink::{EventSink, MemorySink, TracingSink};
pub use crate::types::{
    EnrichedEvent, EventMetadata, EventSubmission, ParsePriorityError, Priority, RequestContext,
    ServiceTags, ValidationResult,
};
pub use crate::validate::validate;

/// Validate then enrich a payload, logging the outcome.
///
/// # Errors
///
/// - [`IngestRejection::Invalid`] with the violation list when validation fails
/// - [`IngestRejection::Fault`] if enrichment fails despite a passing verdict
pub fn ingest(
    payload: Option<&Value>,
    ctx: &RequestContext,
    cfg: &IngestConfig,
    tags: &ServiceTags,
    ids: &dyn EventIdGenerator,
) -> Result<EnrichedEvent, IngestRejection> {
    let span = tracing::span!(Level::INFO, "ingest.event", request_id = %ctx.request_id);
    let _guard = span.enter();

    let verdict = validate(payload, cfg);
    if !verdict.is_valid() {
        warn!(
            function = %tags.function_name,
            stage = %tags.stage,
            requestId = %ctx.request_id,
            errors = ?verdict.errors(),
            "Event validation failed"
        );
        return Err(IngestRejection::Invalid(verdict.into_errors()));
    }

    let Some(payload) = payload else {
        return Err(IngestError::Unvalidated("request body is missing".into()).into());
    };
    let event = enrich(payload, ctx, tags, ids)?;

    info!(
        function = %tags.function_name,
        stage = %tags.stage,
        requestId = %ctx.request_id,
        eventId = %event.event_id,
        eventType = %event.event_type,
        source = %event.source,
        priority = %event.priority,
        processingTimeMs = event.metadata.processing_time_ms,
        "Event processed successfully"
    );
    Ok(event)
}
