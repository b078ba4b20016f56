use crate::envelope::ErrorEnvelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// Each variant is one row of the response table: the status code, the
/// `code` string, and the fixed caller-facing `error` message. Details that
/// could leak internals stay in the variant for logging and never reach the
/// response body.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid JSON in request body: {0}")]
    InvalidJson(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Endpoint not found: {path}")]
    NotFound { path: String },

    #[error("Internal server error: {message}")]
    Internal { request_id: String, message: String },
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidJson(_) | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServerError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::InvalidJson(_) => "INVALID_JSON",
            ServerError::Validation(_) => "VALIDATION_ERROR",
            ServerError::NotFound { .. } => "NOT_FOUND",
            ServerError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Caller-facing message; never includes parser or fault detail.
    fn public_message(&self) -> &'static str {
        match self {
            ServerError::InvalidJson(_) => "Invalid JSON in request body",
            ServerError::Validation(_) => "Validation failed",
            ServerError::NotFound { .. } => "Endpoint not found",
            ServerError::Internal { .. } => "Internal server error",
        }
    }

    /// Builds the response envelope for this error.
    pub fn envelope(&self) -> ErrorEnvelope {
        let mut envelope = ErrorEnvelope::new(self.public_message(), self.error_code());
        match self {
            ServerError::Validation(details) => envelope.details = Some(details.clone()),
            ServerError::NotFound { path } => envelope.path = Some(path.clone()),
            ServerError::Internal { request_id, .. } => {
                envelope.request_id = Some(request_id.clone())
            }
            ServerError::InvalidJson(_) => {}
        }
        envelope
    }

    /// Maps a pipeline rejection; faults are tagged with the request's
    /// correlation id.
    pub fn from_rejection(err: ingest::IngestRejection, request_id: &str) -> Self {
        match err {
            ingest::IngestRejection::Invalid(errors) => ServerError::Validation(errors),
            ingest::IngestRejection::Fault(fault) => ServerError::Internal {
                request_id: request_id.to_string(),
                message: fault.to_string(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.envelope())).into_response()
    }
}

// Display is automatically derived by thiserror::Error

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(err: ServerError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_json_envelope() {
        let (status, body) =
            body_json(ServerError::InvalidJson("expected value at line 1".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_JSON");
        assert_eq!(body["error"], "Invalid JSON in request body");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn validation_envelope_lists_details() {
        let (status, body) = body_json(ServerError::Validation(vec![
            "eventType is required".into(),
            "source is required".into(),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["details"],
            serde_json::json!(["eventType is required", "source is required"])
        );
    }

    #[tokio::test]
    async fn not_found_envelope_echoes_path() {
        let (status, body) = body_json(ServerError::NotFound {
            path: "/unknown".into(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["path"], "/unknown");
    }

    #[tokio::test]
    async fn internal_envelope_hides_message() {
        let (status, body) = body_json(ServerError::Internal {
            request_id: "req-9".into(),
            message: "secret stack detail".into(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["requestId"], "req-9");
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("secret"));
    }

    #[test]
    fn rejection_conversion() {
        let err = ServerError::from_rejection(
            ingest::IngestRejection::Invalid(vec!["x".into()]),
            "req-1",
        );
        assert!(matches!(err, ServerError::Validation(ref d) if d.len() == 1 && d[0] == "x"));
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = ServerError::from_rejection(
            ingest::IngestRejection::Fault(ingest::IngestError::Unvalidated(
                "eventType is missing".into(),
            )),
            "req-2",
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.envelope().request_id.as_deref(), Some("req-2"));
    }
}
