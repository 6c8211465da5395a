//! Health Check Handlers
//!
//! Endpoints for service health monitoring.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall status
    pub status: String,
    /// Account directory status
    pub directory: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Status (healthy/unhealthy)
    pub status: String,
    /// Response time in ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check endpoint
///
/// Returns 200 if the service is running. Does not touch dependencies.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

/// Readiness check endpoint
///
/// Returns 200 when the account directory answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let started = Instant::now();

    let (status, directory) = match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            ComponentStatus {
                status: "healthy".to_string(),
                latency_ms: Some(started.elapsed().as_millis() as u64),
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Account directory health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ComponentStatus {
                    status: "unhealthy".to_string(),
                    latency_ms: None,
                    error: Some("account directory unavailable".to_string()),
                },
            )
        }
    };

    let overall = if status == StatusCode::OK { "ready" } else { "not_ready" };

    (
        status,
        Json(ReadinessResponse {
            status: overall.to_string(),
            directory,
        }),
    )
}
