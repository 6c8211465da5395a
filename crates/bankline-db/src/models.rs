//! Database models - mapped from PostgreSQL tables

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account numbers are drawn uniformly from `0..ACCOUNT_NUMBER_SPACE`
pub const ACCOUNT_NUMBER_SPACE: i64 = 1_000_000_000_000;

// ============================================================================
// Account Models
// ============================================================================

/// A stored bank account
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Primary key, assigned by the store
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// External identifier carried in session tokens
    pub account_number: i64,
    /// Salted password hash; never leaves the service
    #[serde(skip_serializing, default)]
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// An account that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub account_number: i64,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build an empty-balance account with a freshly drawn account number.
    ///
    /// `encrypted_password` must already be hashed.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        encrypted_password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            account_number: generate_account_number(),
            encrypted_password: encrypted_password.into(),
            balance: 0,
            created_at: Utc::now(),
        }
    }

    /// Attach the store-assigned id
    pub fn into_account(self, id: i64) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            account_number: self.account_number,
            encrypted_password: self.encrypted_password,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// Draw a random account number
pub fn generate_account_number() -> i64 {
    rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_SPACE)
}
