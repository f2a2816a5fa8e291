//! HTTP transport tests against a mock counterparty

mod helpers;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mf_gateway::{
    ApiGatewayServer,
    bse::{HttpTransport, Transport, WirePayload},
    error::TransportError,
};

use helpers::{create_test_config, post_json, send_json, soap_result};

#[tokio::test]
async fn soap_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/MFOrderEntry/MFOrder.svc"))
        .and(header("content-type", "application/soap+xml; charset=utf-8"))
        .and(header("SOAPAction", "urn:op"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(
        format!("{}/MFOrderEntry/MFOrder.svc", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let body = transport
        .send(WirePayload::soap("<envelope/>".to_string(), "urn:op"))
        .await
        .unwrap();

    assert_eq!(body, "<ok/>");
}

#[tokio::test]
async fn non_success_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = transport
        .send(WirePayload::json("{}".to_string()))
        .await
        .unwrap_err();

    match err {
        TransportError::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_counterparty_times_out_as_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(server.uri(), Duration::from_millis(200)).unwrap();
    let err = transport
        .send(WirePayload::json("{}".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Connection { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_counterparty_is_connection_error() {
    let transport = HttpTransport::new("http://127.0.0.1:1/nothing", Duration::from_secs(2)).unwrap();
    let err = transport
        .send(WirePayload::json("{}".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Connection { .. }), "{err:?}");
    assert!(err.to_string().contains("127.0.0.1:1"));
}

#[tokio::test]
async fn configured_server_routes_to_mock_counterparty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/StarMFAPI/XSIP/XSIPCancellation"))
        .and(body_string_contains("\"RegnNo\":556677"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "XSIPRegId": 556677,
            "BSERemarks": "XSIP CANCELLED",
            "SuccessFlag": "0",
            "IntRefNo": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/MFOrderEntry/MFOrder.svc/Secure"))
        .and(body_string_contains("<bses:getPassword>"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(soap_result("getPassword", "100|SESSION")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.counterparty.order_entry_url = format!("{}/MFOrderEntry/MFOrder.svc", server.uri());
    config.counterparty.password_url = format!("{}/MFOrderEntry/MFOrder.svc/Secure", server.uri());
    config.counterparty.enhanced_api_url = format!("{}/StarMFAPI", server.uri());
    let gateway = ApiGatewayServer::new(config).unwrap();

    let (status, body) = send_json(
        gateway.router(),
        post_json(
            "/api/v1/enhanced/xsip/cancellation",
            &json!({
                "login_id": "12345",
                "member_code": "M001",
                "password": "pw",
                "client_code": "CL001",
                "regn_no": 556677,
                "int_ref_no": "R1",
                "cease_bse_code": "13",
                "remarks": "investor request"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bse_remarks"], "XSIP CANCELLED");
    assert_eq!(body["success"], true);

    let (status, body) = send_json(
        gateway.router(),
        post_json(
            "/api/v1/auth/getPassword",
            &json!({"user_id": "12345", "password": "secret", "pass_key": "abc123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["encrypted_password"], "SESSION");
}
