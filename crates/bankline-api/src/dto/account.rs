//! Account DTOs

use bankline_db::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Create account request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 100, message = "firstName must be 1 to 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName must be 1 to 100 characters"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Account as returned by the API. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Internal identifier, used in `/account/{id}`
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Public account number, used to sign in
    pub account_number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            account_number: account.account_number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Delete account response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteAccountResponse {
    /// Id of the deleted account
    pub deleted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankline_db::NewAccount;

    #[test]
    fn test_response_omits_password_hash() {
        let account = NewAccount::new("Ada", "Lovelace", "$argon2id$secret").into_account(7);
        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("accountNumber").is_some());
        assert!(json.get("encryptedPassword").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }
}
