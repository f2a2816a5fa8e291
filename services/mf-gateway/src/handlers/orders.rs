//! JSON order handlers: lumpsum, SIP, XSIP, UCC and enhanced cancellation
//!
//! All of them are the same handler instantiated per order type. Business
//! rejections come back as 200 with `success: false`.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::bse::{OrderPipeline, OrderType};
use crate::error::GatewayResult;

/// Decode a JSON request, run it through the pipeline and return the
/// decoded counterparty response as JSON
pub async fn submit<O>(
    State(pipeline): State<OrderPipeline<O>>,
    payload: Result<Json<O::Request>, JsonRejection>,
) -> GatewayResult<Json<O::Response>>
where
    O: OrderType,
    O::Request: DeserializeOwned,
    O::Response: Serialize,
{
    let Json(request) = payload?;
    info!(
        order_type = O::NAME,
        reference = O::reference(&request),
        endpoint = pipeline.endpoint(),
        "Order request received"
    );
    let response = pipeline.execute(&request).await?;
    Ok(Json(response))
}
