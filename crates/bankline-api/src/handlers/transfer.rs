//! Transfer Handler

use axum::Json;

use crate::dto::TransferRequest;
use crate::error::ErrorResponse;
use crate::extractors::ValidatedJson;

/// Accept a transfer request.
///
/// The request is validated and echoed back. No balance is moved.
/// `amount` must be at least 1; zero or negative amounts are rejected with
/// 400 instead of being echoed.
#[utoipa::path(
    post,
    path = "/transfer",
    tag = "Transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Request accepted", body = TransferRequest),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn transfer(
    ValidatedJson(request): ValidatedJson<TransferRequest>,
) -> Json<TransferRequest> {
    tracing::info!(
        to_account = request.to_account,
        amount = request.amount,
        "Transfer requested"
    );

    Json(request)
}
