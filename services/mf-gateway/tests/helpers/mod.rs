//! Shared fixtures for the gateway test suites

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Instant;
use tower::ServiceExt;

use mf_gateway::{
    AppState, GatewayConfig, Transports, create_router,
    bse::{Transport, WirePayload},
    config::{CorsConfig, CounterpartyConfig, MonitoringConfig, ServerConfig},
    error::TransportError,
    metrics::MetricsHandle,
};

/// Configuration suitable for in-process router tests
pub fn create_test_config() -> GatewayConfig {
    GatewayConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            timeout_seconds: 30,
            max_body_size: 1024 * 1024,
            compression: false,
        },
        counterparty: CounterpartyConfig {
            order_entry_url: "http://127.0.0.1:1/MFOrderEntry/MFOrder.svc".to_string(),
            password_url: "http://127.0.0.1:1/MFOrderEntry/MFOrder.svc/Secure".to_string(),
            ucc_url: "http://127.0.0.1:1/UCCAPI".to_string(),
            enhanced_api_url: "http://127.0.0.1:1/StarMFAPI".to_string(),
            elog_url: "http://127.0.0.1:1/ELOG".to_string(),
            timeout_seconds: 5,
        },
        cors: CorsConfig::default(),
        monitoring: MonitoringConfig::default(),
    }
}

/// Canned counterparty reply
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
}

/// Transport double that counts calls and records every payload
#[derive(Debug)]
pub struct SpyTransport {
    reply: Reply,
    calls: AtomicUsize,
    payloads: Mutex<Vec<WirePayload>>,
}

impl SpyTransport {
    pub fn replying(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Body(body.into()),
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Status(status),
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<WirePayload> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn send(&self, payload: WirePayload) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload);
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Status(status) => Err(TransportError::HttpStatus {
                status: *status,
                body: String::new(),
            }),
        }
    }

    fn endpoint(&self) -> &str {
        "http://spy.test/endpoint"
    }
}

/// Every counterparty endpoint served by the same transport
pub fn transports_with(transport: Arc<dyn Transport>) -> Transports {
    Transports {
        password: Arc::clone(&transport),
        order_entry: Arc::clone(&transport),
        ucc: Arc::clone(&transport),
        sip_cancellation: Arc::clone(&transport),
        xsip_cancellation: Arc::clone(&transport),
        elog: transport,
    }
}

/// Router over a single spy transport
pub fn app_with(spy: &Arc<SpyTransport>) -> Router {
    let transport: Arc<dyn Transport> = spy.clone();
    let state = AppState::new(&transports_with(transport), Instant::now(), MetricsHandle::install());
    create_router(&create_test_config(), state)
}

/// Wrap a pipe-delimited record in the counterparty's response envelope
pub fn soap_result(operation: &str, record: &str) -> String {
    format!(
        "<s:Envelope xmlns:s=\"http://www.w3.org/2003/05/soap-envelope\"><s:Body>\
         <{operation}Response xmlns=\"http://bsestarmf.in/\">\
         <{operation}Result>{record}</{operation}Result>\
         </{operation}Response></s:Body></s:Envelope>"
    )
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_xml(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/soap+xml; charset=utf-8")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Drive one request through the router and return status and body text
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// As [`send`], parsing the body as JSON
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap())
}
