//! Authentication error types
//!
//! Every way a request can fail authentication or authorization maps onto
//! one of these variants. Denials all look the same to the client; the
//! variant is only visible in logs.

use bankline_db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Message returned to clients for every denied request
pub const PERMISSION_DENIED: &str = "permission denied";

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    // =========================================================================
    // Token Errors
    // =========================================================================
    /// No token header on the request
    #[error("Token missing")]
    TokenMissing,

    /// Token is malformed, carries a bad signature or lacks required claims
    #[error("Invalid token")]
    InvalidToken,

    /// Token header names an algorithm other than HS256
    #[error("Invalid token algorithm")]
    InvalidAlgorithm,

    /// Token expiry has passed
    #[error("Token has expired")]
    TokenExpired,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    /// Path identifier is not an integer
    #[error("Invalid account id: {0}")]
    InvalidResourceId(String),

    /// No account with the requested id
    #[error("Account {0} not found")]
    AccountNotFound(i64),

    /// Token belongs to a different account than the one requested
    #[error("Token account does not match requested account")]
    AccountMismatch,

    // =========================================================================
    // Credential Errors
    // =========================================================================
    /// Account number and password do not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password is empty or longer than allowed
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Stored hash cannot be parsed
    #[error("Malformed password hash")]
    MalformedHash,

    /// Password hashing failed
    #[error("Password hashing failed")]
    PasswordHashingFailed,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Token could not be signed
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Account lookup failed for a reason other than absence
    #[error("Account directory error: {0}")]
    Directory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidPassword(_) => 400,

            // 403 Forbidden
            Self::TokenMissing
            | Self::InvalidToken
            | Self::InvalidAlgorithm
            | Self::TokenExpired
            | Self::InvalidResourceId(_)
            | Self::AccountNotFound(_)
            | Self::AccountMismatch
            | Self::InvalidCredentials => 403,

            // 500 Internal Server Error
            Self::MalformedHash
            | Self::PasswordHashingFailed
            | Self::Signing(_)
            | Self::Directory(_)
            | Self::Config(_) => 500,
        }
    }

    /// Get an error code for logs (safe to expose)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenMissing => "TOKEN_MISSING",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidAlgorithm => "INVALID_ALGORITHM",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidResourceId(_) => "INVALID_RESOURCE_ID",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountMismatch => "ACCOUNT_MISMATCH",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidPassword(_) => "INVALID_PASSWORD",
            Self::MalformedHash
            | Self::PasswordHashingFailed
            | Self::Signing(_)
            | Self::Directory(_)
            | Self::Config(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error denies access to the caller
    pub fn is_denial(&self) -> bool {
        self.status_code() == 403
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        if self.is_denial() {
            PERMISSION_DENIED.to_string()
        } else if self.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Error body sent to clients, shared by every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    #[schema(example = "permission denied")]
    pub error: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        Self {
            error: error.client_message(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => Self::InvalidAlgorithm,
            _ => Self::InvalidToken,
        }
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        Self::Directory(err.to_string())
    }
}
