//! Generic validate → encode → send → decode driver
//!
//! Every counterparty operation is described by an [`OrderType`]. The
//! pipeline owns the only side effect (the transport call) and is otherwise
//! identical for all of them.

use std::{marker::PhantomData, sync::Arc, time::Instant};
use tracing::{error, info, warn};

use super::transport::{Transport, WirePayload};
use crate::error::{DecodeError, GatewayResult, ValidationError};
use crate::metrics;

/// Descriptor for one counterparty operation
pub trait OrderType: Send + Sync + 'static {
    /// Inbound request record
    type Request: Send + Sync;
    /// Decoded counterparty response
    type Response: Send;

    /// Short name used in logs and metric labels
    const NAME: &'static str;

    /// Caller-supplied reference number for log correlation
    fn reference(request: &Self::Request) -> &str;

    /// Check every rule; the first violation is returned
    fn validate(request: &Self::Request) -> Result<(), ValidationError>;

    /// Render a validated request for the transport at `endpoint`
    fn encode(request: &Self::Request, endpoint: &str) -> WirePayload;

    /// Parse a raw counterparty body
    fn decode(raw: &str) -> Result<Self::Response, DecodeError>;

    /// Whether the counterparty accepted the request
    fn is_success(response: &Self::Response) -> bool;
}

/// Runs one [`OrderType`] against a shared transport
pub struct OrderPipeline<O: OrderType> {
    transport: Arc<dyn Transport>,
    _order: PhantomData<fn() -> O>,
}

impl<O: OrderType> Clone for OrderPipeline<O> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _order: PhantomData,
        }
    }
}

impl<O: OrderType> std::fmt::Debug for OrderPipeline<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderPipeline")
            .field("order_type", &O::NAME)
            .field("endpoint", &self.transport.endpoint())
            .finish()
    }
}

impl<O: OrderType> OrderPipeline<O> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _order: PhantomData,
        }
    }

    /// Counterparty URL this pipeline posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Validate, encode, send and decode a single request
    ///
    /// # Errors
    ///
    /// Validation failures return before the transport is touched.
    /// Transport and decode failures are logged with the order type and
    /// reference number.
    pub async fn execute(&self, request: &O::Request) -> GatewayResult<O::Response> {
        let reference = O::reference(request);

        if let Err(e) = O::validate(request) {
            warn!(
                order_type = O::NAME,
                reference,
                field = e.field,
                rule = e.rule.as_str(),
                "Request rejected: {}",
                e
            );
            metrics::record_validation_failure(O::NAME);
            return Err(e.into());
        }

        let payload = O::encode(request, self.transport.endpoint());
        let start = Instant::now();

        let raw = match self.transport.send(payload).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(
                    order_type = O::NAME,
                    reference,
                    endpoint = self.transport.endpoint(),
                    "Counterparty call failed: {}",
                    e
                );
                metrics::record_counterparty_call(O::NAME, "transport_error", start.elapsed());
                return Err(e.into());
            }
        };

        match O::decode(&raw) {
            Ok(response) => {
                let accepted = O::is_success(&response);
                info!(
                    order_type = O::NAME,
                    reference,
                    accepted,
                    duration_ms = start.elapsed().as_millis(),
                    "Counterparty call completed"
                );
                let outcome = if accepted { "accepted" } else { "rejected" };
                metrics::record_counterparty_call(O::NAME, outcome, start.elapsed());
                Ok(response)
            }
            Err(e) => {
                error!(
                    order_type = O::NAME,
                    reference,
                    raw_body = %raw,
                    "Failed to decode counterparty response: {}",
                    e
                );
                metrics::record_counterparty_call(O::NAME, "decode_error", start.elapsed());
                Err(e.into())
            }
        }
    }
}
