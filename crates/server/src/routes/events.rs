use crate::envelope::AcceptedEnvelope;
use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use ingest::RequestContext;
use serde_json::Value;
use std::sync::Arc;

/// Accept one event for processing.
///
/// The body is parsed here rather than by the `Json` extractor so that a
/// parse failure maps to `INVALID_JSON` and an empty body reaches the
/// validator as an absent payload.
///
/// # Example
/// ```json
/// // Request
/// { "eventType": "order.created", "source": "web", "priority": "high" }
///
/// // Response (202)
/// {
///   "success": true,
///   "message": "Event accepted for processing",
///   "eventId": "evt_m1x2y3z4_k9a8b7c6",
///   "receivedAt": "2024-01-01T00:00:00.000Z"
/// }
/// ```
pub async fn ingest_event(
    State(state): State<Arc<ServerState>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<(StatusCode, Json<AcceptedEnvelope>)> {
    let payload = parse_body(&state, &ctx, body)?;

    let event = ingest::ingest(
        payload.as_ref(),
        &ctx,
        &state.config.ingest,
        &state.tags,
        state.ids.as_ref(),
    )
    .map_err(|err| report(&state, &ctx, ServerError::from_rejection(err, &ctx.request_id)))?;

    state.sink.accept(&event).map_err(|err| {
        report(
            &state,
            &ctx,
            ServerError::Internal {
                request_id: ctx.request_id.clone(),
                message: err.to_string(),
            },
        )
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedEnvelope::new(
            event.event_id,
            ingest::serde_iso::format(&event.received_at),
        )),
    ))
}

/// Empty body → `None`; otherwise the body must be valid JSON.
///
/// A body over `max_body_bytes` is a validation failure, not a parse
/// failure.
fn parse_body(
    state: &ServerState,
    ctx: &RequestContext,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Option<Value>> {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(body_too_large(state, ctx));
        }
        Err(err) => return Err(invalid_json(state, ctx, err.body_text())),
    };

    if bytes.is_empty() {
        return Ok(None);
    }

    serde_json::from_slice::<Value>(&bytes)
        .map(Some)
        .map_err(|err| invalid_json(state, ctx, err.to_string()))
}

fn invalid_json(state: &ServerState, ctx: &RequestContext, reason: String) -> ServerError {
    tracing::warn!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        requestId = %ctx.request_id,
        error = %reason,
        "Invalid JSON in request body"
    );
    ServerError::InvalidJson(reason)
}

fn body_too_large(state: &ServerState, ctx: &RequestContext) -> ServerError {
    let errors = vec![format!(
        "request body must not exceed {} bytes",
        state.config.max_body_bytes
    )];
    tracing::warn!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        requestId = %ctx.request_id,
        errors = ?errors,
        "Event validation failed"
    );
    ServerError::Validation(errors)
}

/// Logs internal faults before they are turned into a response.
fn report(state: &ServerState, ctx: &RequestContext, err: ServerError) -> ServerError {
    if let ServerError::Internal { message, .. } = &err {
        tracing::error!(
            function = %state.tags.function_name,
            stage = %state.tags.stage,
            requestId = %ctx.request_id,
            error = %message,
            "Unexpected error occurred"
        );
    }
    err
}
