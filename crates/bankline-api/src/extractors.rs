//! Custom Axum Extractors

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub use bankline_auth::AuthorizedAccount;

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body that is deserialized and validated, rejecting with
/// `400 {"error": ...}` instead of axum's plain-text rejection
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + validator::Validate,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| error_response(ApiError::BadRequest(e.body_text())))?;

        value
            .validate()
            .map_err(|e| error_response(ApiError::ValidationError(format_validation_errors(&e))))?;

        Ok(ValidatedJson(value))
    }
}

/// Render an [`ApiError`] as a response
pub fn error_response(error: ApiError) -> Response {
    error.into_response()
}

/// Format validation errors into a readable string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Named {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
        #[validate(range(min = 1))]
        amount: i64,
    }

    #[test]
    fn test_format_validation_errors() {
        let value = Named {
            name: String::new(),
            amount: 0,
        };
        let errors = value.validate().unwrap_err();

        assert_eq!(
            format_validation_errors(&errors),
            "amount: validation failed; name must not be empty"
        );
    }
}
