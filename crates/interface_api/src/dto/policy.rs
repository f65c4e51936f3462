//! Policy, payment and lapse DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{CoreError, CoreResult, Money};
use domain_policy::ports::{NewPolicy, PolicyUpdate};
use domain_policy::{Payment, Policy, PolicyStatus};

/// Converts a raw decimal into `Money`, naming the offending field
pub fn money_field(value: Decimal, field: &str) -> CoreResult<Money> {
    Money::new(value).map_err(|e| CoreError::invalid_argument_field(e.to_string(), field))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePolicyRequest {
    pub member_id: Uuid,
    #[validate(length(min = 1))]
    pub plan_type: String,
    pub cover_level: Decimal,
    pub premium: Decimal,
    pub start_date: Option<DateTime<Utc>>,
}

impl CreatePolicyRequest {
    pub fn into_new_policy(self) -> CoreResult<NewPolicy> {
        Ok(NewPolicy {
            member_id: self.member_id.into(),
            plan_type: self.plan_type,
            cover_level: money_field(self.cover_level, "cover_level")?,
            premium: money_field(self.premium, "premium")?,
            start_date: self.start_date,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePolicyRequest {
    pub plan_type: Option<String>,
    pub cover_level: Option<Decimal>,
    pub premium: Option<Decimal>,
    pub status: Option<PolicyStatus>,
}

impl UpdatePolicyRequest {
    pub fn into_update(self) -> CoreResult<PolicyUpdate> {
        Ok(PolicyUpdate {
            plan_type: self.plan_type,
            cover_level: self
                .cover_level
                .map(|v| money_field(v, "cover_level"))
                .transpose()?,
            premium: self.premium.map(|v| money_field(v, "premium")).transpose()?,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PremiumPaymentRequest {
    pub policy_id: Uuid,
    pub amount: Decimal,
}

/// Inbound payment notification from the payment collaborator
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentWebhookRequest {
    Subscription { user_id: Uuid, reference: String },
    Premium { policy_id: Uuid, amount: Decimal },
}

#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub id: Uuid,
    pub member_id: Uuid,
    pub plan_type: String,
    pub cover_level: Decimal,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Policy> for PolicyResponse {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id.into(),
            member_id: policy.member_id.into(),
            plan_type: policy.plan_type,
            cover_level: policy.cover_level.amount(),
            premium: policy.premium.amount(),
            start_date: policy.start_date,
            status: policy.status.to_string(),
            created_at: policy.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub policy_id: Uuid,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.into(),
            policy_id: payment.policy_id.into(),
            amount: payment.amount.amount(),
            paid_at: payment.paid_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArrearsResponse {
    pub policy_id: Uuid,
    pub arrears: Decimal,
}
