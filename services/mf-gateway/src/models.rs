//! HTTP-facing response types shared by the handlers
//!
//! Order request/response records live next to their encoders in
//! [`crate::bse`]; this module only holds the envelopes the gateway adds.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bse::auth::AuthResult;
use crate::error::GatewayError;

/// Error body returned for every non-ELOG failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Machine-readable code, e.g. `VALIDATION_ERROR`
    pub code: String,
    /// Offending field for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.to_string(),
            field: None,
        }
    }
}

impl From<&GatewayError> for ErrorResponse {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Validation(v) => Self {
                success: false,
                error: v.message.clone(),
                code: err.code().to_string(),
                field: Some(v.field.to_string()),
            },
            // Transport and decode details stay in the logs.
            GatewayError::Transport(_) => {
                Self::new(err.code(), "Failed to reach the order processing service")
            }
            GatewayError::Decode(_) => {
                Self::new(err.code(), "Unexpected response from the order processing service")
            }
            GatewayError::BadRequest { message } => Self::new(err.code(), message.clone()),
        }
    }
}

/// `getPassword` reply sent to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPasswordResponse {
    pub success: bool,
    pub code: String,
    /// Same value as `code`, kept for older callers
    pub response_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
    /// Counterparty error text, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_validity: Option<String>,
}

impl From<AuthResult> for GetPasswordResponse {
    fn from(result: AuthResult) -> Self {
        let success = result.is_success();
        let message = if success {
            "Authentication successful".to_string()
        } else {
            result.error_message.clone().unwrap_or_default()
        };
        Self {
            success,
            code: result.response_code.clone(),
            response_code: result.response_code,
            encrypted_password: result.encrypted_password,
            error_message: result.error_message,
            explanation: result.explanation,
            message,
            session_validity: success.then(|| "1 Hour".to_string()),
        }
    }
}

/// Health check summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Configured counterparty endpoint per order type
    pub counterparty: FxHashMap<String, String>,
    pub timestamp: i64,
}
