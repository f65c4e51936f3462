//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, CoreError, CoreResult, Money, PolicyId};

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Received with supporting documents
    Submitted,
    /// Being assessed
    UnderReview,
    /// Approved for payout
    Approved,
    /// Rejected with a recorded reason
    Rejected,
    /// Payout recorded and claim closed
    Paid,
}

impl ClaimStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Rejected | ClaimStatus::Paid)
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::UnderReview => "UnderReview",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Paid => "Paid",
        };
        write!(f, "{s}")
    }
}

/// A claim against a policy
///
/// The document fields are opaque references owned by the document store;
/// nothing in the state machine reads their content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub policy_id: PolicyId,
    /// Death certificate reference
    pub death_certificate: String,
    /// Affidavit reference
    pub affidavit: String,
    pub status: ClaimStatus,
    /// Set on rejection, never cleared
    pub reject_reason: Option<String>,
    /// Set on disbursement; recording only, no money moves here
    pub payout_amount: Option<Money>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Moves the claim into review
    ///
    /// Both documents must be present. They are checked at submission too,
    /// but the guard is re-applied here so a claim that somehow lost a
    /// reference cannot advance.
    pub fn begin_review(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.death_certificate.trim().is_empty() || self.affidavit.trim().is_empty() {
            return Err(CoreError::invalid_argument(
                "claim cannot enter review without both supporting documents",
            ));
        }
        self.transition_to(ClaimStatus::UnderReview, now)
    }

    pub fn approve(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.transition_to(ClaimStatus::Approved, now)
    }

    /// Rejects the claim; a non-empty reason is required
    pub fn reject(&mut self, reason: &str, now: DateTime<Utc>) -> CoreResult<()> {
        if reason.trim().is_empty() {
            return Err(CoreError::invalid_argument_field(
                "rejection requires a reason",
                "reason",
            ));
        }
        self.transition_to(ClaimStatus::Rejected, now)?;
        self.reject_reason = Some(reason.trim().to_string());
        Ok(())
    }

    /// Records the payout and closes the claim
    pub fn disburse(&mut self, payout: Money, now: DateTime<Utc>) -> CoreResult<()> {
        self.transition_to(ClaimStatus::Paid, now)?;
        self.payout_amount = Some(payout);
        Ok(())
    }

    fn transition_to(&mut self, target: ClaimStatus, now: DateTime<Utc>) -> CoreResult<()> {
        if !self.can_transition_to(target) {
            return Err(CoreError::invalid_transition(
                self.status.to_string(),
                target.to_string(),
            ));
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Submitted, UnderReview) | (UnderReview, Approved) | (UnderReview, Rejected)
                | (Approved, Paid)
        )
    }
}
