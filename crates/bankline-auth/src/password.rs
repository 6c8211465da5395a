//! Password Service
//!
//! Argon2id hashing for account passwords. Hashes are stored in PHC string
//! format, so verification reads the parameters from the stored hash and
//! keeps working after the configured costs change.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};
use zeroize::Zeroizing;

use crate::config::PasswordConfig;
use crate::error::{AuthError, AuthResult};

/// Password service for hashing and verification
#[derive(Clone)]
pub struct PasswordService {
    config: PasswordConfig,
}

impl PasswordService {
    /// Create a new password service
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Hash a password using Argon2id with a fresh random salt
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        self.validate_password(password)?;

        let peppered = self.peppered(password);
        let salt = SaltString::generate(&mut OsRng);

        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.hash_length as usize),
        )
        .map_err(|e| AuthError::Config(format!("Invalid Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHashingFailed)?;

        Ok(hash.to_string())
    }

    /// Check a candidate password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`, not an error. Only a hash that cannot be
    /// parsed or evaluated yields [`AuthError::MalformedHash`].
    pub fn verify_password(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let peppered = self.peppered(password);

        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::MalformedHash)?;

        // Constant-time comparison inside argon2
        match Argon2::default().verify_password(peppered.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::MalformedHash),
        }
    }

    /// Reject passwords that cannot be hashed sensibly
    pub fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.is_empty() {
            return Err(AuthError::InvalidPassword("password must not be empty".to_string()));
        }

        if password.len() > self.config.max_password_length {
            return Err(AuthError::InvalidPassword(format!(
                "password must be at most {} characters",
                self.config.max_password_length
            )));
        }

        Ok(())
    }

    fn peppered(&self, password: &str) -> Zeroizing<String> {
        match self.config.pepper {
            Some(ref pepper) => Zeroizing::new(format!("{}{}", password, pepper)),
            None => Zeroizing::new(password.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PasswordConfig {
        PasswordConfig {
            // Lower costs for faster tests
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            max_password_length: 128,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new(test_config());

        let hash = service.hash_password("seedPw").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(service.verify_password("seedPw", &hash).unwrap());
        assert!(!service.verify_password("seedpw", &hash).unwrap());
        assert!(!service.verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_hash_with_pepper() {
        let mut config = test_config();
        config.pepper = Some("secret_pepper".to_string());
        let service = PasswordService::new(config);

        let hash = service.hash_password("secret").unwrap();
        assert!(service.verify_password("secret", &hash).unwrap());

        // Without the pepper the same hash no longer verifies
        let plain = PasswordService::new(test_config());
        assert!(!plain.verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let service = PasswordService::new(test_config());

        let result = service.verify_password("secret", "not-a-hash");
        assert!(matches!(result, Err(AuthError::MalformedHash)));

        let result = service.verify_password("secret", "");
        assert!(matches!(result, Err(AuthError::MalformedHash)));
    }

    #[test]
    fn test_password_validation() {
        let service = PasswordService::new(test_config());

        assert!(matches!(
            service.hash_password(""),
            Err(AuthError::InvalidPassword(_))
        ));
        assert!(matches!(
            service.hash_password(&"x".repeat(129)),
            Err(AuthError::InvalidPassword(_))
        ));
        assert!(service.validate_password("x").is_ok());
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let service = PasswordService::new(test_config());

        let hash1 = service.hash_password("secret").unwrap();
        let hash2 = service.hash_password("secret").unwrap();

        // Same password, different salts
        assert_ne!(hash1, hash2);
        assert!(service.verify_password("secret", &hash1).unwrap());
        assert!(service.verify_password("secret", &hash2).unwrap());
    }
}
