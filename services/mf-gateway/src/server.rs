//! Gateway server: application state, router and lifecycle

use anyhow::Result;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{MethodRouter, get, post},
};
use rustc_hash::FxHashMap;
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    bse::{
        ElogSubmission, HttpTransport, LumpsumOrder, OrderPipeline, PasswordExchange,
        SipCancellation, SipOrder, Transport, UccRegistration, XsipCancellation, XsipOrder,
        cancellation::{SIP_CANCELLATION_PATH, XSIP_CANCELLATION_PATH},
    },
    config::{CounterpartyConfig, GatewayConfig},
    handlers::{self, HealthHandlers, auth, elog, orders, soap},
    metrics::MetricsHandle,
    middleware::{create_cors_layer, logging_middleware},
};

/// One transport per counterparty endpoint
#[derive(Clone)]
pub struct Transports {
    pub password: Arc<dyn Transport>,
    pub order_entry: Arc<dyn Transport>,
    pub ucc: Arc<dyn Transport>,
    pub sip_cancellation: Arc<dyn Transport>,
    pub xsip_cancellation: Arc<dyn Transport>,
    pub elog: Arc<dyn Transport>,
}

impl Transports {
    /// Build HTTP transports for every configured endpoint
    pub fn from_config(config: &CounterpartyConfig) -> Result<Self> {
        let timeout = config.timeout();
        let http = |url: &str| -> Result<Arc<dyn Transport>> {
            let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(url, timeout)?);
            Ok(transport)
        };

        Ok(Self {
            password: http(&config.password_url)?,
            order_entry: http(&config.order_entry_url)?,
            ucc: http(&config.ucc_url)?,
            sip_cancellation: http(&config.enhanced_url(SIP_CANCELLATION_PATH))?,
            xsip_cancellation: http(&config.enhanced_url(XSIP_CANCELLATION_PATH))?,
            elog: http(&config.elog_url)?,
        })
    }

    fn endpoints(&self) -> FxHashMap<String, String> {
        [
            ("password", &self.password),
            ("order_entry", &self.order_entry),
            ("ucc", &self.ucc),
            ("sip_cancellation", &self.sip_cancellation),
            ("xsip_cancellation", &self.xsip_cancellation),
            ("elog", &self.elog),
        ]
        .into_iter()
        .map(|(name, transport)| (name.to_string(), transport.endpoint().to_string()))
        .collect()
    }
}

/// Unified application state; handlers extract the piece they need
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth: OrderPipeline<PasswordExchange>,
    pub ucc: OrderPipeline<UccRegistration>,
    pub lumpsum: OrderPipeline<LumpsumOrder>,
    pub sip: OrderPipeline<SipOrder>,
    pub xsip: OrderPipeline<XsipOrder>,
    pub sip_cancellation: OrderPipeline<SipCancellation>,
    pub xsip_cancellation: OrderPipeline<XsipCancellation>,
    pub elog: OrderPipeline<ElogSubmission>,
    pub health: HealthHandlers,
    pub metrics: MetricsHandle,
}

impl AppState {
    pub fn new(transports: &Transports, start_time: Instant, metrics: MetricsHandle) -> Self {
        Self {
            auth: OrderPipeline::new(Arc::clone(&transports.password)),
            ucc: OrderPipeline::new(Arc::clone(&transports.ucc)),
            lumpsum: OrderPipeline::new(Arc::clone(&transports.order_entry)),
            sip: OrderPipeline::new(Arc::clone(&transports.order_entry)),
            xsip: OrderPipeline::new(Arc::clone(&transports.order_entry)),
            sip_cancellation: OrderPipeline::new(Arc::clone(&transports.sip_cancellation)),
            xsip_cancellation: OrderPipeline::new(Arc::clone(&transports.xsip_cancellation)),
            elog: OrderPipeline::new(Arc::clone(&transports.elog)),
            health: HealthHandlers::new(start_time, transports.endpoints()),
            metrics,
        }
    }
}

/// POST-only route answering other methods with a JSON 405
fn post_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    post(handler).fallback(handlers::method_not_allowed)
}

/// Build the router with every route and middleware layer
pub fn create_router(config: &GatewayConfig, state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/getPassword", post_only(auth::get_password))
        .route("/ucc/register", post_only(orders::submit::<UccRegistration>))
        .route("/lumpsum/order", post_only(orders::submit::<LumpsumOrder>))
        .route("/sip/order", post_only(orders::submit::<SipOrder>))
        .route("/xsip/order", post_only(orders::submit::<XsipOrder>))
        .route(
            "/enhanced/sip/cancellation",
            post_only(orders::submit::<SipCancellation>),
        )
        .route(
            "/enhanced/xsip/cancellation",
            post_only(orders::submit::<XsipCancellation>),
        )
        .route(
            "/elog/request",
            post(elog::request).fallback(elog::method_not_allowed),
        )
        .route(
            "/elog/callback",
            get(elog::callback).fallback(elog::method_not_allowed),
        );

    let mut app = Router::new()
        .nest("/api/v1", api)
        .route(
            &config.monitoring.health_path,
            get(HealthHandlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route("/soap/SipOrderEntry", post_only(soap::sip_order_entry))
        .route("/soap/SipCancellation", post_only(soap::sip_cancellation))
        .route("/soap/XsipOrderEntry", post_only(soap::xsip_order_entry))
        .route("/soap/XsipCancellation", post_only(soap::xsip_cancellation));

    if config.monitoring.metrics_enabled {
        app = app.route(&config.monitoring.metrics_path, get(HealthHandlers::metrics));
    }

    let mut app = app
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            config.server.timeout_seconds,
        )))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http());

    if config.server.compression {
        app = app.layer(CompressionLayer::new());
    }
    if config.cors.enabled {
        app = app.layer(create_cors_layer(config));
    }
    app
}

/// StAR MF gateway server
pub struct ApiGatewayServer {
    config: GatewayConfig,
    transports: Transports,
    start_time: Instant,
}

impl ApiGatewayServer {
    /// Create a new gateway server with HTTP transports from configuration
    pub fn new(config: GatewayConfig) -> Result<Self> {
        info!("Initializing StAR MF gateway");
        config.validate()?;
        let transports = match Transports::from_config(&config.counterparty) {
            Ok(transports) => transports,
            Err(e) => {
                error!("Failed to build counterparty clients: {}", e);
                return Err(e);
            }
        };

        Ok(Self::with_transports(config, transports))
    }

    /// Create a server over caller-supplied transports
    pub fn with_transports(config: GatewayConfig, transports: Transports) -> Self {
        Self {
            config,
            transports,
            start_time: Instant::now(),
        }
    }

    /// Router for this server's configuration and transports
    pub fn router(&self) -> Router {
        let state = AppState::new(&self.transports, self.start_time, MetricsHandle::install());
        create_router(&self.config, state)
    }

    /// Start the server and run until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = match self.config.server_address().parse() {
            Ok(addr) => addr,
            Err(e) => {
                error!(
                    "Invalid server address '{}': {}",
                    self.config.server_address(),
                    e
                );
                return Err(anyhow::anyhow!("Invalid server address: {}", e));
            }
        };

        let app = self.router();
        info!("Starting StAR MF gateway on {}", addr);

        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind TCP listener to {}: {}", addr, e);
                return Err(anyhow::anyhow!("Failed to bind to address {}: {}", addr, e));
            }
        };

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server encountered a fatal error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        info!("StAR MF gateway stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

/// API route documentation
pub fn print_routes() {
    println!("StAR MF Gateway Routes:");
    println!("=======================");
    println!();
    println!("Health & Monitoring:");
    println!("  GET  /api/v1/health                     - Health check");
    println!("  GET  /metrics                           - Prometheus metrics");
    println!();
    println!("Authentication:");
    println!("  POST /api/v1/auth/getPassword           - Exchange password for encrypted session password");
    println!();
    println!("Orders (JSON):");
    println!("  POST /api/v1/ucc/register               - Register or modify a client code");
    println!("  POST /api/v1/lumpsum/order              - Lumpsum purchase/redemption");
    println!("  POST /api/v1/sip/order                  - SIP registration or cancellation");
    println!("  POST /api/v1/xsip/order                 - XSIP registration or cancellation");
    println!("  POST /api/v1/enhanced/sip/cancellation  - Enhanced SIP cancellation");
    println!("  POST /api/v1/enhanced/xsip/cancellation - Enhanced XSIP cancellation");
    println!();
    println!("Orders (SOAP/XML):");
    println!("  POST /soap/SipOrderEntry                - SIP registration");
    println!("  POST /soap/SipCancellation              - SIP cancellation");
    println!("  POST /soap/XsipOrderEntry               - XSIP registration");
    println!("  POST /soap/XsipCancellation             - XSIP cancellation");
    println!();
    println!("ELOG:");
    println!("  POST /api/v1/elog/request               - Start ELOG authentication");
    println!("  GET  /api/v1/elog/callback              - ELOG loopback");
}
