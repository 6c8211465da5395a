//! Per-account authorization
//!
//! Decides whether a request may act on the account named in its path. The
//! decision is all-or-nothing: the token must be valid, the account must
//! exist, and its account number must equal the one in the token.

use std::sync::Arc;

use bankline_db::{Account, AccountStore};
use chrono::{DateTime, Utc};

use crate::error::{AuthError, AuthResult};
use crate::jwt::JwtService;

/// Authorizes account-scoped requests against the account directory
#[derive(Clone)]
pub struct AccountAuthorizer {
    jwt: Arc<JwtService>,
    accounts: Arc<dyn AccountStore>,
}

impl AccountAuthorizer {
    pub fn new(jwt: Arc<JwtService>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { jwt, accounts }
    }

    /// Authorize a request carrying `token` for the account with id `raw_id`.
    ///
    /// Returns the target account on success. Every failure is one of the
    /// denial variants of [`AuthError`] except a directory failure, which is
    /// [`AuthError::Directory`].
    pub async fn authorize(&self, token: Option<&str>, raw_id: &str) -> AuthResult<Account> {
        self.authorize_at(token, raw_id, Utc::now()).await
    }

    /// Same as [`authorize`](Self::authorize) with an explicit clock
    pub async fn authorize_at(
        &self,
        token: Option<&str>,
        raw_id: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Account> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenMissing)?;

        let claims = self.jwt.validate_token_at(token, now)?;

        let id: i64 = raw_id
            .parse()
            .map_err(|_| AuthError::InvalidResourceId(raw_id.to_string()))?;

        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound(id))?;

        if account.account_number != claims.account_number {
            return Err(AuthError::AccountMismatch);
        }

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use async_trait::async_trait;
    use bankline_db::{DbError, DbResult, MemoryAccountStore, NewAccount};
    use chrono::Duration;

    fn jwt() -> Arc<JwtService> {
        Arc::new(
            JwtService::new(&JwtConfig {
                secret: "authorizer-test-secret-with-32-bytes!!".to_string(),
                token_lifetime: std::time::Duration::from_secs(24 * 60 * 60),
            })
            .unwrap(),
        )
    }

    async fn seeded() -> (AccountAuthorizer, Arc<JwtService>, Account, Account) {
        let store = MemoryAccountStore::new();

        let mut first = NewAccount::new("Ada", "Lovelace", "hash");
        first.account_number = 1000;
        let first = store.create(first).await.unwrap();

        let mut second = NewAccount::new("Alan", "Turing", "hash");
        second.account_number = 2000;
        let second = store.create(second).await.unwrap();

        let jwt = jwt();
        let authorizer = AccountAuthorizer::new(jwt.clone(), Arc::new(store));
        (authorizer, jwt, first, second)
    }

    #[tokio::test]
    async fn test_owner_is_authorized() {
        let (authorizer, jwt, first, _) = seeded().await;
        let token = jwt.issue_token(first.account_number).unwrap().token;

        let account = authorizer
            .authorize(Some(&token), &first.id.to_string())
            .await
            .unwrap();

        assert_eq!(account, first);
    }

    #[tokio::test]
    async fn test_other_account_is_denied() {
        let (authorizer, jwt, first, second) = seeded().await;
        let token = jwt.issue_token(first.account_number).unwrap().token;

        let result = authorizer
            .authorize(Some(&token), &second.id.to_string())
            .await;

        assert!(matches!(result, Err(AuthError::AccountMismatch)));
    }

    #[tokio::test]
    async fn test_missing_token_is_denied() {
        let (authorizer, _, first, _) = seeded().await;
        let id = first.id.to_string();

        assert!(matches!(
            authorizer.authorize(None, &id).await,
            Err(AuthError::TokenMissing)
        ));
        assert!(matches!(
            authorizer.authorize(Some("  "), &id).await,
            Err(AuthError::TokenMissing)
        ));
    }

    #[tokio::test]
    async fn test_non_integer_id_is_denied() {
        let (authorizer, jwt, first, _) = seeded().await;
        let token = jwt.issue_token(first.account_number).unwrap().token;

        let result = authorizer.authorize(Some(&token), "abc").await;
        assert!(matches!(result, Err(AuthError::InvalidResourceId(_))));
    }

    #[tokio::test]
    async fn test_unknown_account_is_denied() {
        let (authorizer, jwt, first, _) = seeded().await;
        let token = jwt.issue_token(first.account_number).unwrap().token;

        let result = authorizer.authorize(Some(&token), "999").await;
        assert!(matches!(result, Err(AuthError::AccountNotFound(999))));
    }

    #[tokio::test]
    async fn test_expired_token_is_denied() {
        let (authorizer, jwt, first, _) = seeded().await;
        let token = jwt
            .issue_token_at(first.account_number, Utc::now() - Duration::hours(25))
            .unwrap()
            .token;

        let result = authorizer.authorize(Some(&token), &first.id.to_string()).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_invalid_token_checked_before_id() {
        let (authorizer, _, _, _) = seeded().await;

        let result = authorizer.authorize(Some("garbage"), "abc").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    struct FailingStore;

    #[async_trait]
    impl AccountStore for FailingStore {
        async fn create(&self, _account: NewAccount) -> DbResult<Account> {
            Err(DbError::Connection("unavailable".to_string()))
        }
        async fn find_by_id(&self, _id: i64) -> DbResult<Option<Account>> {
            Err(DbError::Connection("unavailable".to_string()))
        }
        async fn find_by_account_number(&self, _number: i64) -> DbResult<Option<Account>> {
            Err(DbError::Connection("unavailable".to_string()))
        }
        async fn list(&self) -> DbResult<Vec<Account>> {
            Err(DbError::Connection("unavailable".to_string()))
        }
        async fn delete(&self, _id: i64) -> DbResult<()> {
            Err(DbError::Connection("unavailable".to_string()))
        }
        async fn ping(&self) -> DbResult<()> {
            Err(DbError::Connection("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_directory_failure_is_not_a_denial() {
        let jwt = jwt();
        let authorizer = AccountAuthorizer::new(jwt.clone(), Arc::new(FailingStore));
        let token = jwt.issue_token(1000).unwrap().token;

        let result = authorizer.authorize(Some(&token), "1").await;

        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::Directory(_)));
        assert!(!err.is_denial());
        assert_eq!(err.status_code(), 500);
    }
}
