//! Account Handlers
//!
//! Listing and creation are open. Reading and deleting a single account go
//! through the per-account authorization layer, so those handlers receive
//! the already-resolved [`AuthorizedAccount`].

use axum::{extract::State, Json};
use bankline_db::{DbError, NewAccount};
use std::sync::Arc;

use crate::dto::{AccountResponse, CreateAccountRequest, DeleteAccountResponse};
use crate::error::{ApiResult, ErrorResponse};
use crate::extractors::{AuthorizedAccount, ValidatedJson};
use crate::handlers::blocking;
use crate::state::AppState;

/// Fresh account numbers drawn before giving up on collisions
const ACCOUNT_NUMBER_ATTEMPTS: usize = 3;

/// List all accounts
#[utoipa::path(
    get,
    path = "/account",
    tag = "Account",
    responses(
        (status = 200, description = "All accounts", body = Vec<AccountResponse>),
        (status = 500, description = "Account directory unavailable", body = ErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = state.store.list().await?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Open a new account
#[utoipa::path(
    post,
    path = "/account",
    tag = "Account",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Account could not be stored", body = ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let CreateAccountRequest {
        first_name,
        last_name,
        password: plain,
    } = request;

    let password = state.auth.password.clone();
    let encrypted_password = blocking(move || password.hash_password(&plain)).await?;

    let mut attempt = 0;
    let account = loop {
        attempt += 1;
        let new_account = NewAccount::new(&first_name, &last_name, encrypted_password.clone());

        match state.store.create(new_account).await {
            Ok(account) => break account,
            Err(DbError::Duplicate(reason)) if attempt < ACCOUNT_NUMBER_ATTEMPTS => {
                tracing::debug!(attempt, %reason, "Account number collision, drawing another");
            }
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(
        account_id = account.id,
        account_number = account.account_number,
        "Account created"
    );

    Ok(Json(account.into()))
}

/// Get an account
#[utoipa::path(
    get,
    path = "/account/{id}",
    tag = "Account",
    params(("id" = i64, Path, description = "Account id")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "The account", body = AccountResponse),
        (status = 403, description = "Token does not grant access to this account", body = ErrorResponse)
    )
)]
pub async fn get_account(account: AuthorizedAccount) -> Json<AccountResponse> {
    Json(account.into_inner().into())
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/account/{id}",
    tag = "Account",
    params(("id" = i64, Path, description = "Account id")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Account deleted", body = DeleteAccountResponse),
        (status = 403, description = "Token does not grant access to this account", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    account: AuthorizedAccount,
) -> ApiResult<Json<DeleteAccountResponse>> {
    state.store.delete(account.id).await?;

    tracing::info!(
        account_id = account.id,
        account_number = account.account_number,
        "Account deleted"
    );

    Ok(Json(DeleteAccountResponse { deleted: account.id }))
}
