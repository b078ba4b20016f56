use crate::envelope::HealthStatus;
use crate::state::ServerState;
use axum::extract::State;
use axum::{Extension, Json};
use ingest::RequestContext;
use std::sync::Arc;

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check(
    State(state): State<Arc<ServerState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Json<HealthStatus> {
    tracing::info!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        requestId = %ctx.request_id,
        "Health check requested"
    );

    let service = &state.config.service;
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: service.service_name.clone(),
        version: service.version.clone(),
        timestamp: ingest::serde_iso::format(&chrono::Utc::now()),
        stage: service.stage.clone(),
        cold_start: ctx.cold_start,
        region: service.region.clone(),
    })
}
