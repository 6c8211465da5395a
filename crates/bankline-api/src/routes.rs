//! API Routes

use axum::{
    routing::{get, post},
    Router,
};
use bankline_auth::AuthService;
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// All API routes. Routes under `/account/:id` are guarded by the
/// per-account authorization layer.
pub fn api_routes(auth: &AuthService) -> Router<Arc<AppState>> {
    Router::new()
        .merge(account_scoped_routes(auth))
        .route("/signin", post(handlers::auth::sign_in))
        .route(
            "/account",
            get(handlers::account::list_accounts).post(handlers::account::create_account),
        )
        .route("/transfer", post(handlers::transfer::transfer))
}

/// Routes that act on a single account
fn account_scoped_routes(auth: &AuthService) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/account/:id",
            get(handlers::account::get_account).delete(handlers::account::delete_account),
        )
        // route_layer: runs after routing so the `id` parameter is available,
        // and unmatched paths still 404 instead of 403
        .route_layer(auth.layer())
}

/// Health routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<Arc<AppState>> {
    use crate::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
