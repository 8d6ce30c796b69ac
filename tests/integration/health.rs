//! Health endpoint integration tests
//!
//! Tests for the health check endpoints:
//! - GET /health - Full health check with configuration status
//! - GET /health/ready - Readiness probe
//! - GET /health/live - Liveness probe
//! - GET /metrics - Prometheus exposition

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{constants::*, test_server};

#[tokio::test]
async fn test_liveness_always_ok() {
    let server = test_server(&[]);

    let response = server.get("/health/live").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_requires_credentials() {
    let server = test_server(&[("TRYON_BACKEND", "space")]);
    let response = server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["status"], "unhealthy");

    let server = test_server(&[("TRYON_BACKEND", "space"), ("HF_TOKEN", TEST_HF_TOKEN)]);
    let response = server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_health_reports_backend() {
    let server = test_server(&[
        ("TRYON_BACKEND", "positional"),
        ("TRYON_API_TOKEN", TEST_API_TOKEN),
        ("TRYON_API_URL", "http://localhost:9000/predict"),
    ]);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "positional");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
    assert!(body["configuration"].get("error").is_none());
}

#[tokio::test]
async fn test_full_health_names_missing_setting() {
    let server = test_server(&[("TRYON_BACKEND", "positional"), ("TRYON_API_TOKEN", TEST_API_TOKEN)]);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let text = response.text();
    assert!(text.contains("TRYON_API_URL"));
    assert!(!text.contains(TEST_API_TOKEN));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let server = test_server(&[]);

    let response = server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
