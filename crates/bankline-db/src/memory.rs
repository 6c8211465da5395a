//! In-memory account directory
//!
//! Same contract as [`AccountRepo`](crate::AccountRepo), including the unique
//! account number constraint, without a database. Used by tests and by the
//! server when started with `--in-memory`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Account, AccountStore, DbError, DbResult, NewAccount};

#[derive(Default)]
struct Inner {
    next_id: i64,
    accounts: BTreeMap<i64, Account>,
}

/// Account store held in process memory
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> DbResult<Account> {
        let mut inner = self.inner.write().await;

        if inner
            .accounts
            .values()
            .any(|a| a.account_number == account.account_number)
        {
            return Err(DbError::Duplicate(format!(
                "Account number {} already exists",
                account.account_number
            )));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        let account = account.into_account(id);
        inner.accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Account>> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_account_number(&self, account_number: i64) -> DbResult<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    async fn list(&self) -> DbResult<Vec<Account>> {
        Ok(self.inner.read().await.accounts.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        self.inner
            .write()
            .await
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound(format!("Account with id {} not found", id)))
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}
