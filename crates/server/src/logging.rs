//! Structured log output.
//!
//! One JSON object per line. Event fields are flattened to the top level, so
//! a handler call like
//! `info!(function = %tags.function_name, stage = %tags.stage, requestId = %id, "Received request")`
//! renders as
//! `{"timestamp":"...","level":"INFO","message":"Received request","function":"EventIngestion","stage":"dev","requestId":"..."}`.

use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber.
///
/// `directive` is an env-filter string such as `info` or
/// `server=debug,ingest=debug`. `RUST_LOG`, when set, takes precedence.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .try_init();
}
