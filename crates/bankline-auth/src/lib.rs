//! Bankline Authentication Layer
//!
//! Session authentication and per-account authorization:
//!
//! - **Password Security**: Argon2id hashing with constant-time verification
//! - **Session Tokens**: HS256 JWTs carrying `accountNumber` and `expiresAt`
//! - **Account Authorization**: a request may only act on the account its
//!   token was issued to
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Authorization Flow                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Request ─► AccountAuthLayer ─► Handler(AuthorizedAccount)   │
//! │                   │                                          │
//! │                   ▼                                          │
//! │           AccountAuthorizer                                  │
//! │             │           │                                    │
//! │             ▼           ▼                                    │
//! │       JwtService    AccountStore                             │
//! │     (x-jwt-token)   (path id → account)                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod authorizer;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod types;

pub use authorizer::AccountAuthorizer;
pub use config::{AuthConfig, JwtConfig, PasswordConfig, JWT_SECRET_ENV, PASSWORD_PEPPER_ENV};
pub use error::{AuthError, AuthResult, ErrorResponse, PERMISSION_DENIED};
pub use jwt::JwtService;
pub use middleware::{auth_error_response, AccountAuthLayer, AccountAuthMiddleware, TOKEN_HEADER};
pub use password::PasswordService;
pub use types::*;

use bankline_db::AccountStore;
use std::sync::Arc;

/// Main authentication service combining the auth components
#[derive(Clone)]
pub struct AuthService {
    pub jwt: Arc<JwtService>,
    pub password: PasswordService,
    pub authorizer: Arc<AccountAuthorizer>,
}

impl AuthService {
    /// Create a new auth service over an account directory
    pub fn new(accounts: Arc<dyn AccountStore>, config: AuthConfig) -> AuthResult<Self> {
        let jwt = Arc::new(JwtService::new(&config.jwt)?);
        let password = PasswordService::new(config.password.clone());
        let authorizer = Arc::new(AccountAuthorizer::new(jwt.clone(), accounts));

        Ok(Self {
            jwt,
            password,
            authorizer,
        })
    }

    /// Create an authorization layer for account-scoped routes
    pub fn layer(&self) -> AccountAuthLayer {
        AccountAuthLayer::new(self.authorizer.clone())
    }
}
