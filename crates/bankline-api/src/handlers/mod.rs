//! API Handlers

pub mod account;
pub mod auth;
pub mod health;
pub mod transfer;

use bankline_auth::AuthError;

use crate::error::{ApiError, ApiResult};

/// Run password hashing or verification off the async workers
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {}", e)))?
        .map_err(ApiError::from)
}
