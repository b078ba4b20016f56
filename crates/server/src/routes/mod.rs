//! API route handlers
//!
//! - `health`: liveness probe
//! - `events`: event ingestion
//!
//! Anything else, including a known path with the wrong method, lands on
//! [`not_found`].

pub mod events;
pub mod health;

use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::State;
use axum::http::{Method, Uri};
use std::sync::Arc;

/// 404 Not Found handler
///
/// Returns a standardized error response echoing the requested path.
pub async fn not_found(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
) -> ServerError {
    tracing::warn!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        path = %uri.path(),
        method = %method,
        "Unknown endpoint requested"
    );

    ServerError::NotFound {
        path: uri.path().to_string(),
    }
}
