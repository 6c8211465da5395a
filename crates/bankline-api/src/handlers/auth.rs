//! Sign-in Handler

use axum::{extract::State, Json};
use bankline_auth::AuthError;
use std::sync::Arc;

use crate::dto::{SignInRequest, SignInResponse};
use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::extractors::ValidatedJson;
use crate::handlers::blocking;
use crate::state::AppState;

/// Exchange an account number and password for a session token
#[utoipa::path(
    post,
    path = "/signin",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Malformed body or unknown account number", body = ErrorResponse),
        (status = 403, description = "Wrong password", body = ErrorResponse),
        (status = 500, description = "Token could not be issued", body = ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let account_number = request.account_number;

    // 1. Find the account by its public number
    let account = state
        .store
        .find_by_account_number(account_number)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("account with number [{}] not found", account_number))
        })?;

    // 2. Verify password
    let password = state.auth.password.clone();
    let hash = account.encrypted_password.clone();
    let is_valid = blocking(move || password.verify_password(&request.password, &hash)).await?;

    if !is_valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    // 3. Issue the session token
    let issued = state.auth.jwt.issue_token(account.account_number)?;

    tracing::info!(
        account_number = account.account_number,
        expires_at = %issued.expires_at,
        "Account signed in"
    );

    Ok(Json(SignInResponse {
        jwt_token: issued.token,
        account_number: account.account_number,
    }))
}
