//! Health check endpoints
//!
//! Provides endpoints for monitoring and container orchestration:
//! - `/health` - Full health check with configuration status
//! - `/health/ready` - Readiness probe
//! - `/health/live` - Liveness probe
//!
//! None of them contact the provider.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of resolving the active backend's credentials
#[derive(Debug, Serialize)]
pub struct ConfigurationCheck {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub backend: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub configuration: ConfigurationCheck,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

fn check_configuration(state: &AppState) -> ConfigurationCheck {
    match state.backend.resolve(&state.resolver) {
        Ok(_) => ConfigurationCheck {
            status: HealthStatus::Healthy,
            error: None,
        },
        Err(e) => ConfigurationCheck {
            status: HealthStatus::Unhealthy,
            error: Some(e.to_string()),
        },
    }
}

fn status_code(status: &HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Full health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let configuration = check_configuration(&state);
    let status = configuration.status.clone();

    let response = HealthResponse {
        status: status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend.name().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        configuration,
    };

    (status_code(&status), Json(response))
}

/// Readiness probe endpoint
///
/// Ready once the active backend's credentials resolve.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    let status = check_configuration(&state).status;
    (status_code(&status), Json(SimpleHealthResponse { status }))
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
