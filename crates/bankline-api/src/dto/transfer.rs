//! Transfer DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Transfer request. Echoed back as-is; balances are not changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Destination account number
    pub to_account: i64,
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
}
