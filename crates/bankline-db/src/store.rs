//! Account directory capability
//!
//! Handlers and the authorization layer only ever see `dyn AccountStore`, so
//! the backing store can be swapped without touching request handling.

use async_trait::async_trait;

use crate::{Account, DbResult, NewAccount};

/// Lookup and CRUD over stored accounts.
///
/// Implementations serialize their own reads and writes; callers issue
/// independent calls and never hold a transaction across them.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned id
    async fn create(&self, account: NewAccount) -> DbResult<Account>;

    /// Find an account by primary id
    async fn find_by_id(&self, id: i64) -> DbResult<Option<Account>>;

    /// Find an account by its external account number
    async fn find_by_account_number(&self, account_number: i64) -> DbResult<Option<Account>>;

    /// All accounts, ordered by id
    async fn list(&self) -> DbResult<Vec<Account>>;

    /// Remove an account. Returns `DbError::NotFound` when no row matched.
    async fn delete(&self, id: i64) -> DbResult<()>;

    /// Cheap liveness probe used by readiness checks
    async fn ping(&self) -> DbResult<()>;
}
