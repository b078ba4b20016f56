//! Hand-off point for accepted events.
//!
//! Delivery to a queue or store lives outside this crate. The server passes
//! every accepted [`EnrichedEvent`] to an [`EventSink`]; the default
//! [`TracingSink`] only records it at debug level.
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::IngestError;
use crate::types::EnrichedEvent;

/// Receives events after enrichment. Calls are synchronous and must not block.
pub trait EventSink: Send + Sync {
    fn accept(&self, event: &EnrichedEvent) -> Result<(), IngestError>;
}

/// Writes the enriched record to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn accept(&self, event: &EnrichedEvent) -> Result<(), IngestError> {
        let record = serde_json::to_string(event)?;
        debug!(
            stage = %event.metadata.stage,
            eventId = %event.event_id,
            record = %record,
            "Enriched event ready for dispatch"
        );
        Ok(())
    }
}

/// Keeps every accepted event in memory.
///
/// ```rust
/// use ingest::{EventSink, MemorySink};
///
/// let sink = MemorySink::new();
/// assert!(sink.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<EnrichedEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events accepted so far, oldest first.
    pub fn events(&self) -> Vec<EnrichedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn accept(&self, event: &EnrichedEvent) -> Result<(), IngestError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}
