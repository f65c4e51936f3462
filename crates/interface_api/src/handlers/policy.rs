//! Policy and premium payment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::coordinator::PaymentEvent;
use crate::dto::policy::*;
use crate::error::{validation_error, ApiError};
use crate::AppState;

pub async fn list_policies(
    State(state): State<AppState>,
) -> Result<Json<Vec<PolicyResponse>>, ApiError> {
    let policies = state.coordinator.list_policies().await?;
    Ok(Json(policies.into_iter().map(Into::into).collect()))
}

pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state.coordinator.get_policy(id.into()).await?;
    Ok(Json(policy.into()))
}

pub async fn create_policy(
    State(state): State<AppState>,
    Json(request): Json<CreatePolicyRequest>,
) -> Result<Json<PolicyResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let new = request.into_new_policy()?;
    let policy = state.coordinator.create_policy(new).await?;
    Ok(Json(policy.into()))
}

pub async fn update_policy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePolicyRequest>,
) -> Result<Json<PolicyResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let update = request.into_update()?;
    let policy = state.coordinator.update_policy(id.into(), update).await?;
    Ok(Json(policy.into()))
}

pub async fn delete_policy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.coordinator.delete_policy(id.into()).await?;
    Ok(Json(serde_json::json!({ "message": "Policy deleted" })))
}

/// Records a premium payment against a policy's ledger
pub async fn record_payment(
    State(state): State<AppState>,
    Json(request): Json<PremiumPaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let amount = money_field(request.amount, "amount")?;
    let payment = state
        .coordinator
        .record_policy_payment(request.policy_id.into(), amount)
        .await?;
    Ok(Json(payment.into()))
}

/// Current arrears for a policy
pub async fn get_arrears(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArrearsResponse>, ApiError> {
    let arrears = state.coordinator.policy_arrears(id.into()).await?;
    Ok(Json(ArrearsResponse {
        policy_id: id,
        arrears: arrears.amount(),
    }))
}

/// Reinstates a lapsed policy (501 until the product rules are settled)
pub async fn reinstate_policy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.coordinator.reinstate_policy(id.into()).await?;
    Ok(Json(serde_json::json!({ "message": "Policy reinstated" })))
}

/// Payment collaborator webhook
///
/// Routes subscription payments to the account service and premium
/// payments to the policy ledger.
pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(request): Json<PaymentWebhookRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let event = match request {
        PaymentWebhookRequest::Subscription { user_id, reference } => PaymentEvent::Subscription {
            user_id: user_id.into(),
            reference,
        },
        PaymentWebhookRequest::Premium { policy_id, amount } => PaymentEvent::PolicyPremium {
            policy_id: policy_id.into(),
            amount: money_field(amount, "amount")?,
        },
    };
    state.coordinator.payment_webhook(event).await?;
    Ok(Json(serde_json::json!({ "message": "Payment recorded" })))
}
