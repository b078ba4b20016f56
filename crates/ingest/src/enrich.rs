//! Enrichment: turns a validated payload into an [`EnrichedEvent`].
//!
//! ```text
//! payload ──► EventSubmission::from_payload  (fails fast if unvalidated)
//!                   │
//!                   ▼
//!   event_id      ← EventIdGenerator
//!   received_at   ← Utc::now()  (enrichment instant, not request start)
//!   priority      ← input or Normal
//!   data          ← input or {}
//!   metadata      ← ServiceTags + RequestContext + elapsed ms
//! ```
use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::IngestError;
use crate::id::EventIdGenerator;
use crate::types::{
    EnrichedEvent, EventMetadata, EventSubmission, Priority, RequestContext, ServiceTags,
};
use crate::validate::field;

impl EventSubmission {
    /// Extracts the typed fields of a payload that passed validation.
    ///
    /// Only shape is checked here; length limits belong to the validator.
    ///
    /// # Errors
    ///
    /// [`IngestError::Unvalidated`] when a required field is missing or a
    /// field has the wrong type.
    pub fn from_payload(payload: &Value) -> Result<Self, IngestError> {
        let event_type = required_text(payload, "eventType")?;
        let source = required_text(payload, "source")?;

        let priority = field(payload, "priority")
            .map(|value| {
                value
                    .as_str()
                    .and_then(|s| s.parse::<Priority>().ok())
                    .ok_or_else(|| IngestError::Unvalidated("priority is not recognised".into()))
            })
            .transpose()?;

        let data = field(payload, "data")
            .map(|value| {
                value
                    .as_object()
                    .cloned()
                    .ok_or_else(|| IngestError::Unvalidated("data is not an object".into()))
            })
            .transpose()?;

        Ok(Self {
            event_type,
            source,
            priority,
            data,
        })
    }
}

fn required_text(payload: &Value, name: &str) -> Result<String, IngestError> {
    match field(payload, name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(_) => Err(IngestError::Unvalidated(format!("{name} is not a string"))),
        None => Err(IngestError::Unvalidated(format!("{name} is missing"))),
    }
}

/// Enriches a raw payload that has already passed [`validate`](crate::validate).
///
/// # Errors
///
/// [`IngestError::Unvalidated`] if the precondition does not hold.
///
/// ```rust
/// use ingest::{enrich, Priority, RequestContext, SequentialIdGenerator, ServiceTags};
/// use serde_json::json;
///
/// let tags = ServiceTags {
///     function_name: "EventIngestion".into(),
///     stage: "dev".into(),
///     function_version: "$LATEST".into(),
/// };
/// let ctx = RequestContext::new("req-1", true);
/// let ids = SequentialIdGenerator::new();
///
/// let event = enrich(&json!({"eventType": "order.created", "source": "web"}), &ctx, &tags, &ids)
///     .unwrap();
/// assert_eq!(event.event_id, "evt_seq_00000001");
/// assert_eq!(event.priority, Priority::Normal);
/// assert!(event.data.is_empty());
/// assert!(event.metadata.cold_start);
/// ```
pub fn enrich(
    payload: &Value,
    ctx: &RequestContext,
    tags: &ServiceTags,
    ids: &dyn EventIdGenerator,
) -> Result<EnrichedEvent, IngestError> {
    let submission = EventSubmission::from_payload(payload)?;
    Ok(enrich_submission(submission, ctx, tags, ids))
}

/// Infallible half of [`enrich`], for callers already holding a typed submission.
pub fn enrich_submission(
    submission: EventSubmission,
    ctx: &RequestContext,
    tags: &ServiceTags,
    ids: &dyn EventIdGenerator,
) -> EnrichedEvent {
    let EventSubmission {
        event_type,
        source,
        priority,
        data,
    } = submission;

    let event_id = ids.next_id();
    let received_at = Utc::now();
    let processing_time_ms =
        u64::try_from(ctx.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

    EnrichedEvent {
        event_id,
        received_at,
        ingestion_request_id: ctx.request_id.clone(),
        event_type,
        source,
        priority: priority.unwrap_or_default(),
        data: data.unwrap_or_else(Map::new),
        metadata: EventMetadata {
            stage: tags.stage.clone(),
            function_version: tags.function_version.clone(),
            cold_start: ctx.cold_start,
            processing_time_ms,
        },
    }
}
