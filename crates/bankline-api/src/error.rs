//! API error handling
//!
//! Every error reaches the client as `{"error": "<message>"}`. Denials carry
//! the fixed message `permission denied`; server-side failures are logged in
//! full and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bankline_auth::{AuthError, PERMISSION_DENIED};
use bankline_db::DbError;
use thiserror::Error;

pub use bankline_auth::ErrorResponse;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Client Errors
    // =========================================================================
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("permission denied")]
    PermissionDenied,

    // =========================================================================
    // Server Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client
    pub fn client_message(&self) -> String {
        match self {
            Self::PermissionDenied => PERMISSION_DENIED.to_string(),
            Self::Internal(_) => "internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref detail) = self {
            tracing::error!(error = %detail, "Request failed");
        }

        let body = ErrorResponse {
            error: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_denial() {
            tracing::warn!(code = err.error_code(), reason = %err, "Access denied");
            Self::PermissionDenied
        } else if err.is_server_error() {
            Self::Internal(err.to_string())
        } else {
            Self::BadRequest(err.to_string())
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) | DbError::Duplicate(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_denials_collapse() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::AccountMismatch,
        ] {
            assert!(matches!(ApiError::from(err), ApiError::PermissionDenied));
        }
    }

    #[test]
    fn test_auth_infrastructure_is_internal() {
        let err = ApiError::from(AuthError::Signing("key rejected".into()));
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.client_message(), "internal server error");
    }

    #[tokio::test]
    async fn test_denial_body_matches_auth_layer() {
        let from_handler = ApiError::from(AuthError::InvalidCredentials).into_response();
        let from_layer = bankline_auth::auth_error_response(AuthError::AccountMismatch);
        assert_eq!(from_handler.status(), from_layer.status());

        let handler_body = axum::body::to_bytes(from_handler.into_body(), usize::MAX)
            .await
            .unwrap();
        let layer_body = axum::body::to_bytes(from_layer.into_body(), usize::MAX)
            .await
            .unwrap();

        let handler_json: ErrorResponse = serde_json::from_slice(&handler_body).unwrap();
        let layer_json: ErrorResponse = serde_json::from_slice(&layer_body).unwrap();
        assert_eq!(handler_json, layer_json);
        assert_eq!(handler_json.error, PERMISSION_DENIED);
    }

    #[test]
    fn test_db_errors() {
        let err = ApiError::from(DbError::NotFound("Account with id 3 not found".into()));
        assert_eq!(err.client_message(), "Account with id 3 not found");

        let err = ApiError::from(DbError::Connection("refused".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
