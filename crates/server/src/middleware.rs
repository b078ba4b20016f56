use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use ingest::RequestContext;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

/// Header carrying the correlation id in and out.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers attached to every response.
pub const RESPONSE_HEADERS: [(&str, &str); 5] = [
    ("access-control-allow-origin", "*"),
    (
        "access-control-allow-headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key",
    ),
    ("access-control-allow-methods", "GET,POST,OPTIONS"),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
];

/// Per-invocation context middleware
///
/// Resolves the correlation id (caller's `x-request-id` or a fresh UUID),
/// takes the process cold-start flag, logs the request, and installs a
/// [`RequestContext`] for handlers. This is also the outermost fault
/// boundary: a panic below it becomes a generic 500 carrying only the
/// correlation id.
pub async fn invocation_context(
    State(state): State<Arc<ServerState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let cold_start = state.cold_start.take();

    tracing::info!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        requestId = %request_id,
        httpMethod = %request.method(),
        path = %request.uri().path(),
        coldStart = cold_start,
        "Received request"
    );

    request
        .extensions_mut()
        .insert(RequestContext::new(request_id.clone(), cold_start));

    let mut response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(
                function = %state.tags.function_name,
                stage = %state.tags.stage,
                requestId = %request_id,
                error = %message,
                "Unexpected error occurred"
            );
            ServerError::Internal {
                request_id: request_id.clone(),
                message,
            }
            .into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Fixed response header layers
///
/// The content type defaults to JSON; the permissive CORS headers and the
/// two hardening headers always override whatever the handler set.
pub fn response_header_layers() -> Vec<SetResponseHeaderLayer<HeaderValue>> {
    let mut layers = vec![SetResponseHeaderLayer::if_not_present(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    )];
    layers.extend(RESPONSE_HEADERS.into_iter().map(|(name, value)| {
        SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        )
    }));
    layers
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
