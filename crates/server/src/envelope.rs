//! Response bodies.
//!
//! Every body is a flat JSON object with camelCase keys. Failures share
//! [`ErrorEnvelope`]; optional keys are omitted rather than sent as `null`.

use serde::{Deserialize, Serialize};

/// Body of a 202 response. Only the identity fields of the enriched event
/// are echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedEnvelope {
    pub success: bool,
    pub message: String,
    pub event_id: String,
    pub received_at: String,
}

impl AcceptedEnvelope {
    pub fn new(event_id: impl Into<String>, received_at: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Event accepted for processing".to_string(),
            event_id: event_id.into(),
            received_at: received_at.into(),
        }
    }
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            details: None,
            path: None,
            request_id: None,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub stage: String,
    pub cold_start: bool,
    pub region: Option<String>,
}
