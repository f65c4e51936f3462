//! Registration, login and subscription handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::auth::*;
use crate::error::{validation_error, ApiError};
use crate::AppState;

/// Registers a user and starts their 30-day trial
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    request.validate().map_err(validation_error)?;

    let user = state
        .coordinator
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok(Json(RegisterResponse {
        message: "Registered, trial for 30 days.".to_string(),
        trial_ends: user.subscription_expiry,
        user: user.into(),
    }))
}

/// Logs a user in, returning a session token
///
/// An expired trial or subscription comes back as 403 with a reason the
/// client renders as a payment prompt.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate().map_err(validation_error)?;

    let user = state
        .coordinator
        .login(&request.email, &request.password)
        .await?;

    let token = crate::auth::create_token(
        &user.id.to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )
    .map_err(|_| core_kernel::CoreError::unavailable("token signing failed"))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

/// Applies a R300 subscription payment, extending access by 30 days
pub async fn pay_subscription(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionPaymentRequest>,
) -> Result<Json<SubscriptionPaymentResponse>, ApiError> {
    request.validate().map_err(validation_error)?;

    let user = state
        .coordinator
        .pay_subscription(request.user_id.into(), &request.reference)
        .await?;

    Ok(Json(SubscriptionPaymentResponse {
        message: "Subscription paid.".to_string(),
        new_expiry: user.subscription_expiry,
    }))
}
