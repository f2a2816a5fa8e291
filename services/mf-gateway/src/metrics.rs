//! Prometheus metrics for the StAR MF gateway
//!
//! Covers counterparty calls by order type and outcome, call latency and
//! requests rejected before reaching the counterparty. Without the
//! `monitoring` feature every recorder is a no-op and the exposition is empty.

use std::time::Duration;

#[cfg(feature = "monitoring")]
use metrics::{counter, describe_counter, describe_histogram, histogram};
#[cfg(feature = "monitoring")]
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
#[cfg(feature = "monitoring")]
use std::sync::OnceLock;

#[cfg(feature = "monitoring")]
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Renders the process-wide registry for the metrics endpoint
#[derive(Clone)]
pub struct MetricsHandle {
    #[cfg(feature = "monitoring")]
    inner: PrometheusHandle,
}

impl std::fmt::Debug for MetricsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsHandle").finish_non_exhaustive()
    }
}

impl MetricsHandle {
    /// Install the Prometheus recorder once per process and return a handle
    #[must_use]
    pub fn install() -> Self {
        #[cfg(feature = "monitoring")]
        {
            let inner = HANDLE
                .get_or_init(|| {
                    let recorder = PrometheusBuilder::new().build_recorder();
                    let handle = recorder.handle();
                    if let Err(e) = metrics::set_global_recorder(recorder) {
                        tracing::warn!("Metrics recorder already installed: {}", e);
                    }
                    register_metrics();
                    handle
                })
                .clone();
            Self { inner }
        }
        #[cfg(not(feature = "monitoring"))]
        {
            Self {}
        }
    }

    /// Prometheus text exposition
    #[must_use]
    pub fn render(&self) -> String {
        #[cfg(feature = "monitoring")]
        {
            self.inner.render()
        }
        #[cfg(not(feature = "monitoring"))]
        {
            String::new()
        }
    }
}

#[cfg(feature = "monitoring")]
fn register_metrics() {
    describe_counter!(
        "mf_gateway_counterparty_calls_total",
        "Counterparty calls by order type and outcome"
    );
    describe_histogram!(
        "mf_gateway_counterparty_call_duration_seconds",
        "Counterparty call latency in seconds"
    );
    describe_counter!(
        "mf_gateway_validation_failures_total",
        "Requests rejected before reaching the counterparty"
    );
}

/// Record one completed or failed counterparty call
pub fn record_counterparty_call(order_type: &'static str, outcome: &'static str, elapsed: Duration) {
    #[cfg(feature = "monitoring")]
    {
        counter!("mf_gateway_counterparty_calls_total",
            "order_type" => order_type,
            "outcome" => outcome
        )
        .increment(1);
        histogram!("mf_gateway_counterparty_call_duration_seconds",
            "order_type" => order_type
        )
        .record(elapsed.as_secs_f64());
    }
    #[cfg(not(feature = "monitoring"))]
    {
        let _ = (order_type, outcome, elapsed);
    }
}

/// Record a request rejected by validation
pub fn record_validation_failure(order_type: &'static str) {
    #[cfg(feature = "monitoring")]
    {
        counter!("mf_gateway_validation_failures_total", "order_type" => order_type).increment(1);
    }
    #[cfg(not(feature = "monitoring"))]
    {
        let _ = order_type;
    }
}
