//! OpenAPI Documentation

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::dto;
use crate::error::ErrorResponse;
use crate::handlers;

/// Bankline API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bankline API",
        description = "Bank accounts with session sign-in and per-account authorization.",
        version = "0.1.0",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    paths(
        // Health
        handlers::health::health_check,
        handlers::health::readiness_check,
        // Auth
        handlers::auth::sign_in,
        // Account
        handlers::account::list_accounts,
        handlers::account::create_account,
        handlers::account::get_account,
        handlers::account::delete_account,
        // Transfer
        handlers::transfer::transfer,
    ),
    components(
        schemas(
            ErrorResponse,
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::health::ComponentStatus,
            dto::SignInRequest,
            dto::SignInResponse,
            dto::CreateAccountRequest,
            dto::AccountResponse,
            dto::DeleteAccountResponse,
            dto::TransferRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Authentication", description = "Session sign-in"),
        (name = "Account", description = "Account management"),
        (name = "Transfer", description = "Transfer requests")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "jwt_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    bankline_auth::TOKEN_HEADER,
                ))),
            );
        }
    }
}

/// Get the OpenAPI JSON specification
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Bankline API");
        assert!(spec.paths.paths.contains_key("/signin"));
        assert!(spec.paths.paths.contains_key("/account/{id}"));
    }

    #[test]
    fn test_openapi_json() {
        let json = openapi_json().unwrap();
        assert!(json.contains("x-jwt-token"));
    }
}
