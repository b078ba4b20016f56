//! Workspace umbrella crate for the EventFlow ingestion endpoint.
//!
//! Re-exports the event pipeline ([`ingest`]) and the HTTP surface
//! ([`server`]) so embedders can depend on a single crate.

pub use ingest::{
    enrich, ingest, is_event_id, validate, ConfigError, EnrichedEvent, EventIdGenerator,
    EventMetadata, EventSink, EventSubmission, IngestConfig, IngestError, IngestRejection,
    MemorySink, Priority, RequestContext, SequentialIdGenerator, ServiceTags,
    TimeRandomIdGenerator, TracingSink, ValidationResult,
};
pub use server::{
    build_router, start_server, ColdStart, ServerConfig, ServerError, ServerState,
    ServiceEnvironment,
};
