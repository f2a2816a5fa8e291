//! HTTP handlers for each inbound surface

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::GatewayError;
use crate::models::ErrorResponse;

pub mod auth;
pub mod elog;
pub mod health;
pub mod orders;
pub mod soap;

pub use health::HealthHandlers;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: format!("Invalid JSON payload: {}", rejection.body_text()),
        }
    }
}

/// JSON 405 for known paths hit with the wrong method
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed")),
    )
}

/// JSON 404 for unknown paths
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("NOT_FOUND", "Route not found")),
    )
}
