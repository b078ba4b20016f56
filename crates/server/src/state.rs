use crate::config::ServerConfig;
use ingest::{EventIdGenerator, EventSink, ServiceTags, TimeRandomIdGenerator, TracingSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide "first request not yet handled" flag.
///
/// The first [`take`](ColdStart::take) returns `true`, every later one
/// `false`. Concurrent first requests race on a single atomic swap, so
/// exactly one of them observes the cold start.
#[derive(Debug)]
pub struct ColdStart(AtomicBool);

impl ColdStart {
    pub fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    /// Reads and clears the flag.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// True until the first request has been handled.
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for ColdStart {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Tags derived from `config.service`, built once
    pub tags: Arc<ServiceTags>,

    /// Cold-start flag for this process
    pub cold_start: Arc<ColdStart>,

    /// Event id strategy
    pub ids: Arc<dyn EventIdGenerator>,

    /// Receiver for accepted events
    pub sink: Arc<dyn EventSink>,
}

impl ServerState {
    /// Create new server state with the default id generator and sink
    pub fn new(config: ServerConfig) -> Self {
        let tags = config.service.tags();
        Self {
            config: Arc::new(config),
            tags: Arc::new(tags),
            cold_start: Arc::new(ColdStart::new()),
            ids: Arc::new(TimeRandomIdGenerator),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the event id generator
    pub fn with_id_generator(mut self, ids: Arc<dyn EventIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the event sink
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }
}
