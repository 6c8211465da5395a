//! Sign-in DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Sign-in request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Public account number
    #[schema(example = 1000)]
    pub account_number: i64,
    /// Account password
    pub password: String,
}

/// Sign-in response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Session token, sent back in the `x-jwt-token` header
    pub jwt_token: String,
    /// Account number the token was issued to
    pub account_number: i64,
}
