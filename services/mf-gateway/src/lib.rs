//! StAR MF Gateway
//!
//! HTTP gateway translating internal REST/JSON and SOAP/XML requests into
//! calls against the BSE StAR MF mutual-fund platform.
//! Features:
//! - Password exchange, UCC registration and lumpsum orders
//! - SIP/XSIP registration and cancellation over JSON and SOAP/XML
//! - Enhanced SIP/XSIP cancellation and ELOG authentication
//! - Request logging and Prometheus metrics

#![allow(missing_docs)]

use anyhow::Result;

pub mod bse;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod server;

pub use config::{CorsConfig, CounterpartyConfig, GatewayConfig, MonitoringConfig, ServerConfig};
pub use error::{GatewayError, GatewayResult};
pub use server::{ApiGatewayServer, AppState, Transports, create_router};

/// Start the gateway server
pub async fn start_server(config: GatewayConfig) -> Result<()> {
    let server = ApiGatewayServer::new(config)?;
    server.start().await
}
