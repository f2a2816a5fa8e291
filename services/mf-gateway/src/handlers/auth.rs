//! Password exchange handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{info, warn};

use crate::bse::{OrderPipeline, PasswordExchange, auth::AuthRequest};
use crate::error::GatewayResult;
use crate::models::GetPasswordResponse;

/// `POST /api/v1/auth/getPassword`
///
/// 200 with the encrypted password on code 100, 401 with the counterparty's
/// error text otherwise.
pub async fn get_password(
    State(pipeline): State<OrderPipeline<PasswordExchange>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> GatewayResult<(StatusCode, Json<GetPasswordResponse>)> {
    let Json(request) = payload?;
    info!("Password exchange request for user: {}", request.user_id);

    let result = pipeline.execute(&request).await?;
    if result.is_success() {
        info!("Password exchange successful for user: {}", request.user_id);
        return Ok((StatusCode::OK, Json(result.into())));
    }

    warn!(
        user_id = %request.user_id,
        response_code = %result.response_code,
        "Password exchange rejected: {}",
        result.error_message.as_deref().unwrap_or_default()
    );
    Ok((StatusCode::UNAUTHORIZED, Json(result.into())))
}
