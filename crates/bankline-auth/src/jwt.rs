//! Session Token Service
//!
//! Issues and validates HS256-signed JWTs carrying an account number and an
//! expiry. Tokens are stateless: any token that verifies under the process
//! secret and has not reached its `expiresAt` is accepted, there is no
//! revocation list.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::{IssuedToken, SessionClaims};

/// The only algorithm tokens are signed with or accepted under
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT service for session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    validation: Validation,
}

impl JwtService {
    /// Create a new JWT service.
    ///
    /// Fails when no secret is configured; signing with an empty key would
    /// produce tokens anyone can forge.
    pub fn new(config: &JwtConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::Config("JWT secret is not configured".to_string()));
        }

        let lifetime = Duration::from_std(config.token_lifetime)
            .map_err(|e| AuthError::Config(format!("Invalid token lifetime: {}", e)))?;

        // Expiry lives in the custom `expiresAt` claim, checked in `validate_token_at`
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            lifetime,
            validation,
        })
    }

    /// Issue a token for an account, valid for the configured lifetime
    pub fn issue_token(&self, account_number: i64) -> AuthResult<IssuedToken> {
        self.issue_token_at(account_number, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_token_at(
        &self,
        account_number: i64,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;
        let claims = SessionClaims {
            account_number,
            expires_at: expires_at.timestamp(),
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        tracing::debug!(account_number, expires_at = %expires_at, "Issued session token");

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token against the current time
    pub fn validate_token(&self, token: &str) -> AuthResult<SessionClaims> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// Checks, in order: structure, algorithm (HS256 only), signature,
    /// presence and shape of the claims, then expiry.
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<SessionClaims> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.expires_at <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
