//! Claims DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_claims::ports::NewClaim;
use domain_claims::Claim;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitClaimRequest {
    pub policy_id: Uuid,
    /// Document reference from a prior upload
    #[validate(length(min = 1))]
    pub death_certificate: String,
    /// Document reference from a prior upload
    #[validate(length(min = 1))]
    pub affidavit: String,
}

impl From<SubmitClaimRequest> for NewClaim {
    fn from(request: SubmitClaimRequest) -> Self {
        Self {
            policy_id: request.policy_id.into(),
            death_certificate: request.death_certificate,
            affidavit: request.affidavit,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectClaimRequest {
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DisburseClaimRequest {
    pub payout: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub policy_id: Uuid,
    pub death_certificate: String,
    pub affidavit: String,
    pub status: String,
    pub reject_reason: Option<String>,
    pub payout_amount: Option<Decimal>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.into(),
            policy_id: claim.policy_id.into(),
            death_certificate: claim.death_certificate,
            affidavit: claim.affidavit,
            status: claim.status.to_string(),
            reject_reason: claim.reject_reason,
            payout_amount: claim.payout_amount.map(|m| m.amount()),
            submitted_at: claim.submitted_at,
            updated_at: claim.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentUploadResponse {
    pub reference: String,
}
