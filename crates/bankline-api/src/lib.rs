//! Bankline REST API
//!
//! # API Structure
//!
//! ```text
//! /
//! ├── POST   /signin         - Exchange account number + password for a token
//! ├── GET    /account        - List accounts
//! ├── POST   /account        - Open an account
//! ├── GET    /account/:id    - Read an account          (x-jwt-token)
//! ├── DELETE /account/:id    - Delete an account        (x-jwt-token)
//! ├── POST   /transfer       - Transfer request (echo)
//! ├── GET    /health         - Liveness
//! └── GET    /ready          - Readiness
//! ```
//!
//! A token only grants access to the account it was issued to. Every denial
//! is answered with `403 {"error":"permission denied"}`.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Enable response compression
    pub enable_compression: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// Serve Swagger UI and the OpenAPI document
    pub enable_swagger: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_compression: true,
            enable_tracing: true,
            enable_swagger: true,
            max_body_size: 64 * 1024, // 64KB
        }
    }
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut app = Router::new()
        .merge(routes::api_routes(&state.auth))
        .merge(routes::health_routes());

    if config.enable_swagger {
        app = app.merge(routes::swagger_routes());
    }

    let mut router = app
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .with_state(state);

    // Add request ID middleware
    let x_request_id = HeaderName::from_static("x-request-id");

    // Add tracing
    if config.enable_tracing {
        router = router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        );
    }

    // Outermost so the id exists before the trace span is made
    router = router
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    // Add compression
    if config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    // Add CORS
    if config.enable_cors {
        let cors = if config.cors_origins.iter().any(|o| o == "*") {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(
                    config
                        .cors_origins
                        .iter()
                        .filter_map(|o| o.parse().ok())
                        .collect::<Vec<_>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(Any)
        };
        router = router.layer(cors);
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.enable_cors);
        assert!(config.enable_swagger);
        assert_eq!(config.max_body_size, 64 * 1024);
    }
}
