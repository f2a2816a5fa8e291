//! Request logging, request ids and CORS

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::GatewayConfig;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware
///
/// Propagates the caller's `x-request-id` or mints one, and echoes it on
/// the response.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = get_client_ip(&request);

    let existing = request.headers().get(REQUEST_ID_HEADER).cloned();
    let request_id = match existing {
        Some(value) => value,
        None => {
            let minted = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request.headers_mut().insert(REQUEST_ID_HEADER, minted.clone());
            minted
        }
    };

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = duration.as_millis(),
        client_ip = %client_ip,
        request_id = request_id.to_str().unwrap_or_default(),
        "Request processed"
    );

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

/// CORS layer factory
pub fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_credentials(config.cors.allow_credentials)
        .max_age(std::time::Duration::from_secs(config.cors.max_age_seconds));

    if config.cors.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_origin(tower_http::cors::Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Result<Vec<Method>, _> = config
        .cors
        .allowed_methods
        .iter()
        .map(|method| method.parse())
        .collect();

    if let Ok(methods) = methods {
        cors = cors.allow_methods(methods);
    }

    let headers: Result<Vec<HeaderName>, _> = config
        .cors
        .allowed_headers
        .iter()
        .map(|header| header.parse())
        .collect();

    if let Ok(headers) = headers {
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Extract client IP from proxy headers
fn get_client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next());
    if let Some(ip) = forwarded {
        return ip.trim().to_string();
    }

    request
        .headers()
        .get("X-Real-IP")
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}
