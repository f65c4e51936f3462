//! Policy domain ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{CoreError, CoreResult, MemberId, Money, PaymentId, PolicyId};

use crate::policy::{Payment, Policy, PolicyStatus};

/// Data for creating a policy
#[derive(Debug, Clone)]
pub struct NewPolicy {
    pub member_id: MemberId,
    pub plan_type: String,
    pub cover_level: Money,
    pub premium: Money,
    /// Cover start; when absent, cover starts at the creation instant
    pub start_date: Option<DateTime<Utc>>,
}

/// Partial update to a policy record
#[derive(Debug, Clone, Default)]
pub struct PolicyUpdate {
    pub plan_type: Option<String>,
    pub cover_level: Option<Money>,
    pub premium: Option<Money>,
    pub status: Option<PolicyStatus>,
}

/// Persistence port for policies
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn get(&self, id: PolicyId) -> CoreResult<Policy>;
    async fn list(&self) -> CoreResult<Vec<Policy>>;
    async fn list_by_member(&self, member_id: MemberId) -> CoreResult<Vec<Policy>>;
    async fn list_active(&self) -> CoreResult<Vec<Policy>>;
    async fn create(&self, new: NewPolicy, now: DateTime<Utc>) -> CoreResult<Policy>;
    async fn update(&self, id: PolicyId, update: PolicyUpdate) -> CoreResult<Policy>;
    async fn delete(&self, id: PolicyId) -> CoreResult<()>;

    /// Transitions Active -> Lapsed atomically
    ///
    /// Returns true if the row moved, false if it was no longer Active
    /// (already lapsed by a concurrent run, or cancelled in between). The
    /// guard must be part of the same write - this is the per-policy
    /// critical section of the lapse batch.
    async fn mark_lapsed(&self, id: PolicyId) -> CoreResult<bool>;
}

/// Persistence port for the append-only payment ledger
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn append(
        &self,
        policy_id: PolicyId,
        amount: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Payment>;

    /// Payments for a policy, ordered by paid-at
    async fn list_for(&self, policy_id: PolicyId) -> CoreResult<Vec<Payment>>;
}

/// Outbound reminder collaborator (external, fire-and-forget)
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_reminder(&self, member_id: MemberId) -> CoreResult<()>;
}

/// Retail payment platform synchronization (external)
///
/// The core only records that a sync was requested; ingestion of whatever
/// the platform returns happens behind this port.
#[async_trait]
pub trait RetailSyncPort: Send + Sync {
    /// Requests a sync, returning the number of payments ingested
    async fn sync_payments(&self) -> CoreResult<u32>;
}

/// In-memory implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct MockPolicyStore {
        policies: Arc<RwLock<HashMap<PolicyId, Policy>>>,
    }

    impl MockPolicyStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_policies(policies: Vec<Policy>) -> Self {
            let store = Self::new();
            for policy in policies {
                store.policies.write().await.insert(policy.id, policy);
            }
            store
        }
    }

    #[async_trait]
    impl PolicyStore for MockPolicyStore {
        async fn get(&self, id: PolicyId) -> CoreResult<Policy> {
            self.policies
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Policy", id))
        }

        async fn list(&self) -> CoreResult<Vec<Policy>> {
            Ok(self.policies.read().await.values().cloned().collect())
        }

        async fn list_by_member(&self, member_id: MemberId) -> CoreResult<Vec<Policy>> {
            Ok(self
                .policies
                .read()
                .await
                .values()
                .filter(|p| p.member_id == member_id)
                .cloned()
                .collect())
        }

        async fn list_active(&self) -> CoreResult<Vec<Policy>> {
            Ok(self
                .policies
                .read()
                .await
                .values()
                .filter(|p| p.status == PolicyStatus::Active)
                .cloned()
                .collect())
        }

        async fn create(&self, new: NewPolicy, now: DateTime<Utc>) -> CoreResult<Policy> {
            let policy = Policy {
                id: PolicyId::new_v7(),
                member_id: new.member_id,
                plan_type: new.plan_type,
                cover_level: new.cover_level,
                premium: new.premium,
                start_date: new.start_date.unwrap_or(now),
                status: PolicyStatus::Active,
                created_at: now,
            };
            self.policies
                .write()
                .await
                .insert(policy.id, policy.clone());
            Ok(policy)
        }

        async fn update(&self, id: PolicyId, update: PolicyUpdate) -> CoreResult<Policy> {
            let mut policies = self.policies.write().await;
            let policy = policies
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found("Policy", id))?;
            if let Some(plan_type) = update.plan_type {
                policy.plan_type = plan_type;
            }
            if let Some(cover_level) = update.cover_level {
                policy.cover_level = cover_level;
            }
            if let Some(premium) = update.premium {
                policy.premium = premium;
            }
            if let Some(status) = update.status {
                policy.status = status;
            }
            Ok(policy.clone())
        }

        async fn delete(&self, id: PolicyId) -> CoreResult<()> {
            self.policies
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| CoreError::not_found("Policy", id))
        }

        async fn mark_lapsed(&self, id: PolicyId) -> CoreResult<bool> {
            let mut policies = self.policies.write().await;
            let policy = policies
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found("Policy", id))?;
            if policy.status != PolicyStatus::Active {
                return Ok(false);
            }
            policy.status = PolicyStatus::Lapsed;
            Ok(true)
        }
    }

    #[derive(Debug, Default)]
    pub struct MockPaymentStore {
        payments: Arc<RwLock<Vec<Payment>>>,
    }

    impl MockPaymentStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl PaymentStore for MockPaymentStore {
        async fn append(
            &self,
            policy_id: PolicyId,
            amount: Money,
            now: DateTime<Utc>,
        ) -> CoreResult<Payment> {
            let payment = Payment {
                id: PaymentId::new_v7(),
                policy_id,
                amount,
                paid_at: now,
            };
            self.payments.write().await.push(payment.clone());
            Ok(payment)
        }

        async fn list_for(&self, policy_id: PolicyId) -> CoreResult<Vec<Payment>> {
            let mut payments: Vec<_> = self
                .payments
                .read()
                .await
                .iter()
                .filter(|p| p.policy_id == policy_id)
                .cloned()
                .collect();
            payments.sort_by_key(|p| p.paid_at);
            Ok(payments)
        }
    }

    /// Reminder sender that counts sends and can be made to fail
    #[derive(Debug, Default)]
    pub struct MockNotificationSender {
        pub sent: AtomicU32,
        pub fail: std::sync::atomic::AtomicBool,
    }

    impl MockNotificationSender {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let sender = Self::default();
            sender.fail.store(true, Ordering::SeqCst);
            sender
        }

        pub fn sent_count(&self) -> u32 {
            self.sent.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationSender for MockNotificationSender {
        async fn send_reminder(&self, _member_id: MemberId) -> CoreResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CoreError::unavailable("sms gateway down"));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Retail sync stub that counts requests
    #[derive(Debug, Default)]
    pub struct MockRetailSync {
        pub requests: AtomicU32,
    }

    impl MockRetailSync {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn request_count(&self) -> u32 {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RetailSyncPort for MockRetailSync {
        async fn sync_payments(&self) -> CoreResult<u32> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }
}
