//! ELOG request and loopback handlers
//!
//! This surface mirrors the counterparty: every answer is HTTP 200 and
//! failures are reported as `statuscode` 101 in the body.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::bse::elog::{self, CallbackOutcome, ElogRequest, ElogResponse};
use crate::bse::{ElogSubmission, OrderPipeline};
use crate::error::GatewayError;

/// Query string of the counterparty's loopback call
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    pub elgstatus: Option<String>,
}

/// Loopback answers are either an evaluation or a 101 body
#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum CallbackReply {
    Evaluated(CallbackOutcome),
    Rejected(ElogResponse),
}

/// `POST /api/v1/elog/request`
pub async fn request(
    State(pipeline): State<OrderPipeline<ElogSubmission>>,
    payload: Result<Json<ElogRequest>, JsonRejection>,
) -> Json<ElogResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Failed to decode ELOG request: {}", rejection.body_text());
            return Json(ElogResponse::failure("Invalid JSON payload", ""));
        }
    };

    match pipeline.execute(&request).await {
        Ok(response) => {
            info!(
                client_code = %request.clientcode,
                statuscode = %response.statuscode,
                "ELOG request completed"
            );
            Json(response)
        }
        Err(GatewayError::Validation(e)) => {
            Json(ElogResponse::failure(e.message, request.intrefno))
        }
        Err(e) => {
            error!(client_code = %request.clientcode, "Failed to submit ELOG request: {}", e);
            Json(ElogResponse::failure("Failed to process ELOG request", request.intrefno))
        }
    }
}

/// `GET /api/v1/elog/callback?STATUS=..&elgstatus=..`
pub async fn callback(Query(params): Query<CallbackParams>) -> Json<CallbackReply> {
    let Some(status) = params.status.filter(|s| !s.is_empty()) else {
        warn!("ELOG callback without STATUS parameter");
        return Json(CallbackReply::Rejected(ElogResponse::failure(
            "Missing STATUS parameter",
            "",
        )));
    };
    let elg_status = params.elgstatus.unwrap_or_default();

    let outcome = elog::evaluate_callback(&status, &elg_status, chrono::Utc::now().timestamp());
    info!(
        status = %outcome.status,
        elg_status = %outcome.elg_status,
        is_valid = outcome.is_valid,
        "ELOG callback received"
    );
    Json(CallbackReply::Evaluated(outcome))
}

/// Wrong-method answer in the ELOG body shape
pub async fn method_not_allowed() -> Json<ElogResponse> {
    Json(ElogResponse::failure("Method not allowed", ""))
}
