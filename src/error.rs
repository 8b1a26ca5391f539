use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use marketplace::MarketplaceError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable `x-user-id` on a route that needs an authenticated user
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Marketplace(#[from] MarketplaceError),
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorResponse) {
        let body = |error: &str, code: &str| ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
            fields: None,
            success: false,
        };

        match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                body("Authentication required", "UNAUTHENTICATED"),
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, body(&message, "BAD_REQUEST"))
            }
            ApiError::Marketplace(MarketplaceError::Validation(fields)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    fields: Some(fields.into_inner()),
                    ..body("The given data was invalid.", "VALIDATION_ERROR")
                },
            ),
            ApiError::Marketplace(MarketplaceError::Forbidden(action)) => {
                warn!("Access denied: {}", action);
                (StatusCode::FORBIDDEN, body("Access denied", "ACCESS_DENIED"))
            }
            ApiError::Marketplace(MarketplaceError::NotFound { resource, id }) => (
                StatusCode::NOT_FOUND,
                body(&format!("{} {} not found", resource, id), "NOT_FOUND"),
            ),
            ApiError::Marketplace(MarketplaceError::LastAdmin) => (
                StatusCode::CONFLICT,
                body("Cannot remove the last administrator.", "LAST_ADMIN"),
            ),
            ApiError::Marketplace(other) => {
                error!("Unexpected failure: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    body("Internal server error", "INTERNAL_ERROR"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
