//! Premium ledger
//!
//! `compute_arrears` is the single source of truth for "is this policy
//! behind". It is a pure function so the lapse evaluator, reporting and
//! tests all agree by construction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use core_kernel::{elapsed_billing_periods, CoreError, CoreResult, Money, PolicyId};

use crate::policy::{Payment, Policy};
use crate::ports::{PaymentStore, PolicyStore};

/// Amount owed on a policy at `now`
///
/// Owed = premium x completed billing periods since the start date, less
/// everything paid, floored at zero. A policy inside its first 30 days
/// owes nothing yet.
pub fn compute_arrears(policy: &Policy, payments: &[Payment], now: DateTime<Utc>) -> Money {
    let periods = elapsed_billing_periods(policy.start_date, now);
    let owed = policy.premium.times(periods);
    let paid: Money = payments.iter().map(|p| p.amount).sum();
    owed.saturating_sub(&paid)
}

/// Records premium payments against policies
pub struct PolicyLedger {
    policies: Arc<dyn PolicyStore>,
    payments: Arc<dyn PaymentStore>,
}

impl PolicyLedger {
    pub fn new(policies: Arc<dyn PolicyStore>, payments: Arc<dyn PaymentStore>) -> Self {
        Self { policies, payments }
    }

    /// Appends a payment to the policy's ledger
    ///
    /// Does not touch policy status - lapsing is the evaluator's job, and
    /// reinstating is nobody's yet. The payment is recorded even against a
    /// lapsed policy so the money is on the books for audit.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a non-positive amount, `NotFound` for an
    /// unknown policy.
    pub async fn record_payment(
        &self,
        policy_id: PolicyId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        if !amount.is_positive() {
            return Err(CoreError::invalid_argument_field(
                "payment amount must be positive",
                "amount",
            ));
        }

        // NotFound surfaces before anything is written.
        let policy = self.policies.get(policy_id).await?;
        let payment = self.payments.append(policy.id, amount, now).await?;
        info!(policy_id = %policy.id, amount = %amount, "premium payment recorded");
        Ok(payment)
    }

    /// Current arrears for a policy
    pub async fn arrears(&self, policy_id: PolicyId, now: DateTime<Utc>) -> CoreResult<Money> {
        let policy = self.policies.get(policy_id).await?;
        let payments = self.payments.list_for(policy.id).await?;
        Ok(compute_arrears(&policy, &payments, now))
    }

    /// Reinstates a lapsed policy
    ///
    /// Deliberately unimplemented: the business rules for reinstatement
    /// (back-premium collection, waiting periods) are not settled.
    pub async fn reinstate(&self, _policy_id: PolicyId) -> CoreResult<()> {
        Err(CoreError::not_implemented("policy reinstatement"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyStatus;
    use crate::ports::mock::{MockPaymentStore, MockPolicyStore};
    use crate::ports::NewPolicy;
    use chrono::{Duration, TimeZone};
    use core_kernel::{MemberId, PaymentId};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn policy_with_premium(premium: Money) -> Policy {
        Policy {
            id: PolicyId::new(),
            member_id: MemberId::new(),
            plan_type: "family".into(),
            cover_level: Money::new(dec!(10000)).unwrap(),
            premium,
            start_date: t0(),
            status: PolicyStatus::Active,
            created_at: t0(),
        }
    }

    fn payment_of(policy_id: PolicyId, amount: Money) -> Payment {
        Payment {
            id: PaymentId::new(),
            policy_id,
            amount,
            paid_at: t0(),
        }
    }

    #[test]
    fn test_arrears_two_periods_one_paid() {
        let policy = policy_with_premium(Money::new(dec!(100)).unwrap());
        let payments = vec![payment_of(policy.id, Money::new(dec!(100)).unwrap())];
        let owed = compute_arrears(&policy, &payments, t0() + Duration::days(65));
        assert_eq!(owed.amount(), dec!(100));
    }

    #[test]
    fn test_arrears_nothing_owed_in_first_period() {
        let policy = policy_with_premium(Money::new(dec!(50)).unwrap());
        let owed = compute_arrears(&policy, &[], t0() + Duration::days(10));
        assert_eq!(owed, Money::zero());
    }

    #[test]
    fn test_arrears_floors_at_zero_when_overpaid() {
        let policy = policy_with_premium(Money::new(dec!(100)).unwrap());
        let payments = vec![payment_of(policy.id, Money::new(dec!(500)).unwrap())];
        let owed = compute_arrears(&policy, &payments, t0() + Duration::days(65));
        assert_eq!(owed, Money::zero());
    }

    #[tokio::test]
    async fn test_record_payment_rejects_non_positive() {
        let ledger = PolicyLedger::new(
            Arc::new(MockPolicyStore::new()),
            Arc::new(MockPaymentStore::new()),
        );
        let err = ledger
            .record_payment(PolicyId::new(), Money::zero(), t0())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_record_payment_unknown_policy() {
        let ledger = PolicyLedger::new(
            Arc::new(MockPolicyStore::new()),
            Arc::new(MockPaymentStore::new()),
        );
        let err = ledger
            .record_payment(PolicyId::new(), Money::new(dec!(100)).unwrap(), t0())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_record_payment_does_not_change_status() {
        let policies = Arc::new(MockPolicyStore::new());
        let payments = Arc::new(MockPaymentStore::new());
        let ledger = PolicyLedger::new(policies.clone(), payments.clone());

        let policy = policies
            .create(
                NewPolicy {
                    member_id: MemberId::new(),
                    plan_type: "single".into(),
                    cover_level: Money::new(dec!(5000)).unwrap(),
                    premium: Money::new(dec!(50)).unwrap(),
                    start_date: Some(t0()),
                },
                t0(),
            )
            .await
            .unwrap();
        policies.mark_lapsed(policy.id).await.unwrap();

        // Late payment on a lapsed policy is still recorded for audit.
        ledger
            .record_payment(policy.id, Money::new(dec!(50)).unwrap(), t0())
            .await
            .unwrap();
        assert_eq!(
            policies.get(policy.id).await.unwrap().status,
            PolicyStatus::Lapsed
        );
        assert_eq!(payments.list_for(policy.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reinstate_is_not_implemented() {
        let ledger = PolicyLedger::new(
            Arc::new(MockPolicyStore::new()),
            Arc::new(MockPaymentStore::new()),
        );
        let err = ledger.reinstate(PolicyId::new()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotImplemented { .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::policy::PolicyStatus;
    use core_kernel::{MemberId, PaymentId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    proptest! {
        #[test]
        fn arrears_never_negative(
            premium_cents in 0u64..1_000_000u64,
            paid_cents in proptest::collection::vec(1u64..100_000u64, 0..10),
            days in 0i64..2000i64,
        ) {
            let start = chrono::Utc::now();
            let policy = Policy {
                id: core_kernel::PolicyId::new(),
                member_id: MemberId::new(),
                plan_type: "family".into(),
                cover_level: Money::new(dec!(10000)).unwrap(),
                premium: Money::from_cents(premium_cents),
                start_date: start,
                status: PolicyStatus::Active,
                created_at: start,
            };
            let payments: Vec<_> = paid_cents.iter().map(|&c| Payment {
                id: PaymentId::new(),
                policy_id: policy.id,
                amount: Money::from_cents(c),
                paid_at: start,
            }).collect();

            let owed = compute_arrears(&policy, &payments, start + chrono::Duration::days(days));
            prop_assert!(!owed.amount().is_sign_negative());
        }
    }
}
