//! Authentication configuration
//!
//! Centralized configuration for token signing and password hashing with
//! secure defaults following OWASP recommendations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "BANK_JWT_SECRET";

/// Environment variable holding the optional password pepper
pub const PASSWORD_PEPPER_ENV: &str = "BANK_PASSWORD_PEPPER";

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token configuration
    pub jwt: JwtConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
}

/// Session token configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HMAC secret used both to sign and to verify tokens
    pub secret: String,
    /// How long an issued token stays valid
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set before start
            token_lifetime: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("token_lifetime", &self.token_lifetime)
            .finish()
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB (OWASP recommends 19456 KiB = 19 MiB minimum)
    pub memory_cost: u32,
    /// Time cost (iterations) - OWASP recommends 2 minimum
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
    /// Pepper (additional secret, optional)
    pub pepper: Option<String>,
    /// Maximum password length (to prevent DoS)
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            max_password_length: 128,
        }
    }
}

impl AuthConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.jwt.secret.is_empty() {
            errors.push(format!("JWT secret must be set ({})", JWT_SECRET_ENV));
        } else if self.jwt.secret.len() < 32 {
            errors.push("JWT secret should be at least 256 bits (32 bytes)".to_string());
        }

        if self.jwt.token_lifetime.is_zero() {
            errors.push("Token lifetime must be greater than zero".to_string());
        }

        if self.password.memory_cost < 19456 {
            errors.push("Argon2 memory cost should be at least 19456 KiB (OWASP recommendation)".to_string());
        }
        if self.password.time_cost < 2 {
            errors.push("Argon2 time cost should be at least 2 (OWASP recommendation)".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.jwt.token_lifetime, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.password.memory_cost, 19456);
    }

    #[test]
    fn test_config_validation_missing_secret() {
        let errors = AuthConfig::default().validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains(JWT_SECRET_ENV)));
    }

    #[test]
    fn test_config_validation_short_secret() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_valid() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "a".repeat(32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut config = JwtConfig::default();
        config.secret = "super-secret-value".to_string();
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }

    #[test]
    fn test_lifetime_deserializes_from_humantime() {
        let config: JwtConfig =
            serde_json::from_str(r#"{"secret":"s","token_lifetime":"12h"}"#).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(12 * 60 * 60));
    }
}
