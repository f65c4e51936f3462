//! Batch lapse evaluation
//!
//! Walks every active policy, computes its arrears at a single `now`, and
//! lapses those more than one full premium behind. One missed cycle is
//! grace; the second tips the policy over.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use core_kernel::CoreResult;

use crate::ledger::compute_arrears;
use crate::policy::Policy;
use crate::ports::{NotificationSender, PaymentStore, PolicyStore};

/// Outcome of one lapse batch run
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LapseSummary {
    /// Active policies examined
    pub evaluated: u32,
    /// Policies newly lapsed this run
    pub lapsed: u32,
    /// Policies examined and left Active
    pub unchanged: u32,
    /// Reminders that could not be delivered
    pub reminders_failed: u32,
}

/// Runs the lapse batch over all active policies
pub struct LapseEvaluator {
    policies: Arc<dyn PolicyStore>,
    payments: Arc<dyn PaymentStore>,
    notifications: Arc<dyn NotificationSender>,
}

impl LapseEvaluator {
    pub fn new(
        policies: Arc<dyn PolicyStore>,
        payments: Arc<dyn PaymentStore>,
        notifications: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            policies,
            payments,
            notifications,
        }
    }

    /// True when the policy has fallen past the one-cycle grace
    fn should_lapse(&self, policy: &Policy, arrears: core_kernel::Money) -> bool {
        arrears.amount() > policy.premium.amount()
    }

    /// Evaluates every active policy at `now` and lapses the delinquent ones
    ///
    /// Each lapse commits per policy through the store's atomic
    /// Active -> Lapsed guard, so a policy lapsed by a concurrent run is
    /// counted as unchanged rather than lapsed twice. Re-running with the
    /// same clock lapses nothing new. Reminder delivery failures are
    /// logged and tallied, never propagated; the status change has already
    /// committed by then.
    pub async fn run_lapse_check(&self, now: DateTime<Utc>) -> CoreResult<LapseSummary> {
        let active = self.policies.list_active().await?;
        let mut summary = LapseSummary::default();

        for policy in active {
            summary.evaluated += 1;

            let payments = self.payments.list_for(policy.id).await?;
            let arrears = compute_arrears(&policy, &payments, now);
            if !self.should_lapse(&policy, arrears) {
                summary.unchanged += 1;
                continue;
            }

            if !self.policies.mark_lapsed(policy.id).await? {
                // Someone else moved it first.
                summary.unchanged += 1;
                continue;
            }
            summary.lapsed += 1;
            info!(policy_id = %policy.id, arrears = %arrears, "policy lapsed");

            if let Err(err) = self.notifications.send_reminder(policy.member_id).await {
                summary.reminders_failed += 1;
                warn!(
                    policy_id = %policy.id,
                    member_id = %policy.member_id,
                    error = %err,
                    "lapse reminder delivery failed"
                );
            }
        }

        info!(
            evaluated = summary.evaluated,
            lapsed = summary.lapsed,
            unchanged = summary.unchanged,
            reminders_failed = summary.reminders_failed,
            "lapse check complete"
        );
        Ok(summary)
    }
}
