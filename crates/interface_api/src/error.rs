//! HTTP error translation
//!
//! The taxonomy-to-status mapping lives here and nowhere else:
//!
//! | `CoreError`        | status |
//! |--------------------|--------|
//! | NotFound           | 404    |
//! | DuplicateKey       | 409    |
//! | InvalidArgument    | 400    |
//! | AccessDenied       | 403    |
//! | InvalidTransition  | 422    |
//! | Unavailable        | 503    |
//! | NotImplemented     | 501    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use core_kernel::CoreError;

/// Error envelope returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// `trial_expired` or `subscription_expired`, on 403 only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Offending field, on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Wrapper so handlers can return `CoreResult` values directly
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_type, reason, field) = match &err {
            CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found", None, None),
            CoreError::DuplicateKey { field } => (
                StatusCode::CONFLICT,
                "duplicate_key",
                None,
                Some(field.clone()),
            ),
            CoreError::InvalidArgument { field, .. } => (
                StatusCode::BAD_REQUEST,
                "invalid_argument",
                None,
                field.clone(),
            ),
            CoreError::AccessDenied { reason } => (
                StatusCode::FORBIDDEN,
                "access_denied",
                Some(match reason {
                    core_kernel::AccessDeniedReason::TrialExpired => "trial_expired".to_string(),
                    core_kernel::AccessDeniedReason::SubscriptionExpired => {
                        "subscription_expired".to_string()
                    }
                }),
                None,
            ),
            CoreError::InvalidTransition { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_transition",
                None,
                None,
            ),
            CoreError::Unavailable { .. } => {
                error!(error = %err, "collaborator unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", None, None)
            }
            CoreError::NotImplemented { .. } => {
                (StatusCode::NOT_IMPLEMENTED, "not_implemented", None, None)
            }
        };

        let message = match &err {
            // Clients render these verbatim.
            CoreError::AccessDenied { reason } => reason.user_message().to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            reason,
            field,
        };
        (status, Json(body)).into_response()
    }
}

/// Maps request DTO validation failures onto `InvalidArgument`
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let field = errors.field_errors().keys().next().map(|k| k.to_string());
    let err = match field {
        Some(field) => CoreError::invalid_argument_field("request validation failed", field),
        None => CoreError::invalid_argument("request validation failed"),
    };
    ApiError(err)
}
