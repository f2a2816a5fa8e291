//! Health check and metrics handlers

use axum::{extract::State, http::header, response::IntoResponse};
use axum::response::Json;
use rustc_hash::FxHashMap;
use std::{sync::Arc, time::Instant};
use tracing::debug;

use crate::metrics::MetricsHandle;
use crate::models::HealthCheckResponse;

/// Health check handlers
#[derive(Clone)]
pub struct HealthHandlers {
    start_time: Instant,
    counterparty: Arc<FxHashMap<String, String>>,
}

impl HealthHandlers {
    pub fn new(start_time: Instant, counterparty: FxHashMap<String, String>) -> Self {
        Self {
            start_time,
            counterparty: Arc::new(counterparty),
        }
    }

    /// Health check endpoint
    pub async fn health_check(State(handlers): State<Self>) -> Json<HealthCheckResponse> {
        debug!("Health check request");
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: handlers.start_time.elapsed().as_secs(),
            counterparty: handlers.counterparty.as_ref().clone(),
            timestamp: chrono::Utc::now().timestamp(),
        })
    }

    /// Prometheus metrics endpoint
    pub async fn metrics(State(handle): State<MetricsHandle>) -> impl IntoResponse {
        (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
    }
}
