//! Core authentication types

use bankline_db::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// Field names on the wire are `accountNumber` and `expiresAt`. Both must be
/// present as integers; anything else fails decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Account number of the account the token was issued to
    pub account_number: i64,
    /// Expiry as Unix seconds
    pub expires_at: i64,
}

/// A freshly signed session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS serialization
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Account a request has been authorized for, placed in request extensions
/// by [`AccountAuthLayer`](crate::AccountAuthLayer)
#[derive(Debug, Clone)]
pub struct AuthorizedAccount(pub Account);

impl AuthorizedAccount {
    pub fn into_inner(self) -> Account {
        self.0
    }
}

impl std::ops::Deref for AuthorizedAccount {
    type Target = Account;

    fn deref(&self) -> &Account {
        &self.0
    }
}
