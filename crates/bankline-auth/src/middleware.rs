//! Authorization Middleware for Axum
//!
//! Guards account-scoped routes. The layer reads the session token from the
//! `x-jwt-token` header and the account id from the `id` path parameter,
//! then either forwards the request with an [`AuthorizedAccount`] in its
//! extensions or answers 403 `{"error":"permission denied"}` itself.
//!
//! Must be installed with `route_layer` so the path parameters are matched
//! before it runs.

use axum::{
    async_trait,
    extract::{FromRequestParts, RawPathParams, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::authorizer::AccountAuthorizer;
use crate::error::{AuthError, ErrorResponse};
use crate::types::AuthorizedAccount;

/// Header carrying the session token
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Path parameter naming the target account
pub const ACCOUNT_ID_PARAM: &str = "id";

/// Per-account authorization layer
#[derive(Clone)]
pub struct AccountAuthLayer {
    authorizer: Arc<AccountAuthorizer>,
}

impl AccountAuthLayer {
    pub fn new(authorizer: Arc<AccountAuthorizer>) -> Self {
        Self { authorizer }
    }
}

impl<S> Layer<S> for AccountAuthLayer {
    type Service = AccountAuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccountAuthMiddleware {
            inner,
            authorizer: self.authorizer.clone(),
        }
    }
}

/// Per-account authorization service
#[derive(Clone)]
pub struct AccountAuthMiddleware<S> {
    inner: S,
    authorizer: Arc<AccountAuthorizer>,
}

impl<S> Service<Request> for AccountAuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let authorizer = self.authorizer.clone();
        // Keep the service that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let token = parts
                .headers
                .get(TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let decision = match account_id_param(&mut parts).await {
                Some(raw_id) => authorizer.authorize(token.as_deref(), &raw_id).await,
                None => Err(AuthError::InvalidResourceId(String::new())),
            };

            match decision {
                Ok(account) => {
                    tracing::debug!(account_id = account.id, "Account access authorized");
                    parts.extensions.insert(AuthorizedAccount(account));
                    inner.call(Request::from_parts(parts, body)).await
                }
                Err(e) => Ok(auth_error_response(e)),
            }
        })
    }
}

async fn account_id_param(parts: &mut Parts) -> Option<String> {
    let params = RawPathParams::from_request_parts(parts, &()).await.ok()?;
    params
        .iter()
        .find(|(name, _)| *name == ACCOUNT_ID_PARAM)
        .map(|(_, value)| value.to_owned())
}

/// Create error response for authorization errors
pub fn auth_error_response(error: AuthError) -> Response {
    if error.is_server_error() {
        tracing::error!(code = error.error_code(), error = %error, "Authorization failed");
    } else {
        tracing::warn!(code = error.error_code(), reason = %error, "Access denied");
    }

    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(ErrorResponse::from(&error))).into_response()
}

// =============================================================================
// Axum Extractors
// =============================================================================

/// Extracts the account authorized by [`AccountAuthLayer`].
///
/// Rejects with 403 when the layer did not run, so a handler that asks for
/// it can never be reached unauthorized.
#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedAccount
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizedAccount>()
            .cloned()
            .ok_or_else(|| auth_error_response(AuthError::TokenMissing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::jwt::JwtService;
    use axum::{body::Body, routing::get, Router};
    use bankline_db::{AccountStore, MemoryAccountStore, NewAccount};
    use tower::ServiceExt;

    async fn whoami(account: AuthorizedAccount) -> String {
        account.account_number.to_string()
    }

    async fn unguarded(account: AuthorizedAccount) -> String {
        account.id.to_string()
    }

    async fn app() -> (Router, Arc<JwtService>) {
        let store = MemoryAccountStore::new();
        for number in [1000, 2000] {
            let mut account = NewAccount::new("Test", "User", "hash");
            account.account_number = number;
            store.create(account).await.unwrap();
        }

        let jwt = Arc::new(
            JwtService::new(&JwtConfig {
                secret: "middleware-test-secret-with-32-bytes!".to_string(),
                token_lifetime: std::time::Duration::from_secs(60),
            })
            .unwrap(),
        );
        let authorizer = Arc::new(AccountAuthorizer::new(jwt.clone(), Arc::new(store)));

        let router = Router::new()
            .route("/account/:id", get(whoami))
            .route_layer(AccountAuthLayer::new(authorizer))
            .route("/open", get(unguarded));

        (router, jwt)
    }

    fn request(uri: &str, token: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_owner_passes_through() {
        let (app, jwt) = app().await;
        let token = jwt.issue_token(1000).unwrap().token;

        let response = app.oneshot(request("/account/1", Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"1000");
    }

    #[tokio::test]
    async fn test_mismatch_is_forbidden() {
        let (app, jwt) = app().await;
        let token = jwt.issue_token(1000).unwrap().token;

        let response = app.oneshot(request("/account/2", Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "permission denied" })
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_forbidden() {
        let (app, _) = app().await;

        let response = app.oneshot(request("/account/1", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bad_id_is_forbidden() {
        let (app, jwt) = app().await;
        let token = jwt.issue_token(1000).unwrap().token;

        let response = app.oneshot(request("/account/abc", Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "permission denied" })
        );
    }

    #[tokio::test]
    async fn test_extractor_without_layer_is_forbidden() {
        let (app, _) = app().await;

        let response = app.oneshot(request("/open", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_error_response() {
        let response = auth_error_response(AuthError::AccountMismatch);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = auth_error_response(AuthError::Directory("down".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
