//! Claims workflow service
//!
//! Thin orchestration over the `Claim` state machine: load, apply the
//! transition, save. All guards live on the aggregate so they hold no
//! matter which caller drives the workflow.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use core_kernel::{ClaimId, CoreError, CoreResult, Money, PolicyId};

use crate::claim::Claim;
use crate::ports::{ClaimStore, NewClaim};

pub struct ClaimsWorkflow {
    claims: Arc<dyn ClaimStore>,
}

impl ClaimsWorkflow {
    pub fn new(claims: Arc<dyn ClaimStore>) -> Self {
        Self { claims }
    }

    /// Submits a new claim
    ///
    /// Both document references must be present and non-empty. The policy
    /// itself is the caller's concern; this crate never reads policy state.
    pub async fn submit(&self, new: NewClaim, now: DateTime<Utc>) -> CoreResult<Claim> {
        if new.death_certificate.trim().is_empty() {
            return Err(CoreError::invalid_argument_field(
                "death certificate is required",
                "death_certificate",
            ));
        }
        if new.affidavit.trim().is_empty() {
            return Err(CoreError::invalid_argument_field(
                "affidavit is required",
                "affidavit",
            ));
        }

        let claim = self.claims.create(new, now).await?;
        info!(claim_id = %claim.id, policy_id = %claim.policy_id, "claim submitted");
        Ok(claim)
    }

    pub async fn get(&self, id: ClaimId) -> CoreResult<Claim> {
        self.claims.get(id).await
    }

    pub async fn list(&self) -> CoreResult<Vec<Claim>> {
        self.claims.list().await
    }

    pub async fn list_by_policy(&self, policy_id: PolicyId) -> CoreResult<Vec<Claim>> {
        self.claims.list_by_policy(policy_id).await
    }

    pub async fn begin_review(&self, id: ClaimId, now: DateTime<Utc>) -> CoreResult<Claim> {
        self.apply(id, now, |claim, now| claim.begin_review(now))
            .await
    }

    pub async fn approve(&self, id: ClaimId, now: DateTime<Utc>) -> CoreResult<Claim> {
        self.apply(id, now, |claim, now| claim.approve(now)).await
    }

    pub async fn reject(
        &self,
        id: ClaimId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<Claim> {
        self.apply(id, now, |claim, now| claim.reject(reason, now))
            .await
    }

    pub async fn disburse(
        &self,
        id: ClaimId,
        payout: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Claim> {
        self.apply(id, now, |claim, now| claim.disburse(payout, now))
            .await
    }

    async fn apply<F>(&self, id: ClaimId, now: DateTime<Utc>, transition: F) -> CoreResult<Claim>
    where
        F: FnOnce(&mut Claim, DateTime<Utc>) -> CoreResult<()>,
    {
        let mut claim = self.claims.get(id).await?;
        transition(&mut claim, now)?;
        self.claims.save(&claim).await?;
        info!(claim_id = %claim.id, status = %claim.status, "claim transitioned");
        Ok(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimStatus;
    use crate::ports::mock::MockClaimStore;
    use rust_decimal_macros::dec;

    fn workflow() -> ClaimsWorkflow {
        ClaimsWorkflow::new(Arc::new(MockClaimStore::new()))
    }

    fn valid_submission() -> NewClaim {
        NewClaim {
            policy_id: PolicyId::new(),
            death_certificate: "uploads/cert.pdf".into(),
            affidavit: "uploads/affidavit.pdf".into(),
        }
    }

    #[tokio::test]
    async fn test_submit_requires_both_documents() {
        let workflow = workflow();
        let now = Utc::now();

        let mut missing_cert = valid_submission();
        missing_cert.death_certificate = String::new();
        let err = workflow.submit(missing_cert, now).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));

        let mut missing_affidavit = valid_submission();
        missing_affidavit.affidavit = "   ".into();
        let err = workflow.submit(missing_affidavit, now).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_full_lifecycle_persists_each_step() {
        let workflow = workflow();
        let now = Utc::now();

        let claim = workflow.submit(valid_submission(), now).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);

        let claim = workflow.begin_review(claim.id, now).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::UnderReview);

        let claim = workflow.approve(claim.id, now).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);

        let payout = Money::new(dec!(15000)).unwrap();
        let claim = workflow.disburse(claim.id, payout, now).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Paid);

        let stored = workflow.get(claim.id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Paid);
        assert_eq!(stored.payout_amount, Some(payout));
    }

    #[tokio::test]
    async fn test_failed_transition_is_not_persisted() {
        let workflow = workflow();
        let now = Utc::now();

        let claim = workflow.submit(valid_submission(), now).await.unwrap();
        // Submitted -> Approved skips review.
        let err = workflow.approve(claim.id, now).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));

        let stored = workflow.get(claim.id).await.unwrap();
        assert_eq!(stored.status, ClaimStatus::Submitted);
    }

    #[tokio::test]
    async fn test_reject_records_reason() {
        let workflow = workflow();
        let now = Utc::now();

        let claim = workflow.submit(valid_submission(), now).await.unwrap();
        workflow.begin_review(claim.id, now).await.unwrap();
        let claim = workflow
            .reject(claim.id, "cover not in force at date of death", now)
            .await
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert_eq!(
            claim.reject_reason.as_deref(),
            Some("cover not in force at date of death")
        );
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let workflow = workflow();
        let err = workflow
            .begin_review(ClaimId::new(), Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
