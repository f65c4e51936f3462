//! Lifecycle coordinator
//!
//! The single entry point the HTTP layer talks to. It sequences calls
//! into the domain services and performs no business computation of its
//! own - every rule lives in the domain crate that owns it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use core_kernel::{
    AgentId, ClaimId, Clock, CoreResult, DependantId, MemberId, Money, PolicyId, UserId,
};
use domain_account::ports::{CredentialVerifier, UserStore};
use domain_account::{AccountService, User};
use domain_claims::ports::{ClaimStore, DocumentStore, NewClaim};
use domain_claims::{Claim, ClaimsWorkflow};
use domain_party::ports::{NewAgent, NewDependant, NewMember, PartyStore};
use domain_party::validation::{validate_agent, validate_dependant, validate_member};
use domain_party::{Agent, Dependant, Member};
use domain_policy::ports::{NewPolicy, PolicyUpdate};
use domain_policy::{
    LapseEvaluator, LapseSummary, NotificationSender, Payment, PaymentStore, Policy, PolicyLedger,
    PolicyStore, RetailSyncPort,
};

/// Outcome of a reminder fan-out
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReminderSummary {
    pub sent: u32,
    pub failed: u32,
}

/// A payment event from the payment collaborator
///
/// Subscription payments reference a user; premium payments reference a
/// policy. The webhook body decides which, the coordinator only routes.
#[derive(Debug, Clone)]
pub enum PaymentEvent {
    Subscription { user_id: UserId, reference: String },
    PolicyPremium { policy_id: PolicyId, amount: Money },
}

pub struct LifecycleCoordinator {
    clock: Arc<dyn Clock>,
    accounts: AccountService,
    ledger: PolicyLedger,
    lapse: LapseEvaluator,
    claims: ClaimsWorkflow,
    party: Arc<dyn PartyStore>,
    policies: Arc<dyn PolicyStore>,
    documents: Arc<dyn DocumentStore>,
    notifications: Arc<dyn NotificationSender>,
    retail: Arc<dyn RetailSyncPort>,
}

/// The collaborators the coordinator wires together
pub struct CoordinatorParts {
    pub clock: Arc<dyn Clock>,
    pub users: Arc<dyn UserStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub party: Arc<dyn PartyStore>,
    pub policies: Arc<dyn PolicyStore>,
    pub payments: Arc<dyn PaymentStore>,
    pub claims: Arc<dyn ClaimStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub notifications: Arc<dyn NotificationSender>,
    pub retail: Arc<dyn RetailSyncPort>,
}

impl LifecycleCoordinator {
    pub fn new(parts: CoordinatorParts) -> Self {
        Self {
            accounts: AccountService::new(
                parts.clock.clone(),
                parts.users,
                parts.verifier,
            ),
            ledger: PolicyLedger::new(parts.policies.clone(), parts.payments.clone()),
            lapse: LapseEvaluator::new(
                parts.policies.clone(),
                parts.payments,
                parts.notifications.clone(),
            ),
            claims: ClaimsWorkflow::new(parts.claims),
            party: parts.party,
            policies: parts.policies,
            documents: parts.documents,
            notifications: parts.notifications,
            retail: parts.retail,
            clock: parts.clock,
        }
    }

    // --- account events ---

    pub async fn register(&self, name: &str, email: &str, password: &str) -> CoreResult<User> {
        self.accounts.register(name, email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> CoreResult<User> {
        self.accounts.login(email, password).await
    }

    pub async fn pay_subscription(&self, user_id: UserId, reference: &str) -> CoreResult<User> {
        self.accounts
            .apply_subscription_payment(user_id, reference)
            .await
    }

    /// Routes a payment event to the right ledger
    pub async fn payment_webhook(&self, event: PaymentEvent) -> CoreResult<()> {
        match event {
            PaymentEvent::Subscription { user_id, reference } => {
                self.pay_subscription(user_id, &reference).await?;
            }
            PaymentEvent::PolicyPremium { policy_id, amount } => {
                self.record_policy_payment(policy_id, amount).await?;
            }
        }
        Ok(())
    }

    // --- party records ---

    pub async fn list_members(&self) -> CoreResult<Vec<Member>> {
        self.party.list_members().await
    }

    pub async fn create_member(&self, new: NewMember) -> CoreResult<Member> {
        validate_member(&new.name, &new.id_number)?;
        self.party.create_member(new, self.clock.now()).await
    }

    pub async fn update_member(&self, id: MemberId, new: NewMember) -> CoreResult<Member> {
        validate_member(&new.name, &new.id_number)?;
        self.party.update_member(id, new).await
    }

    pub async fn delete_member(&self, id: MemberId) -> CoreResult<()> {
        self.party.delete_member(id).await
    }

    pub async fn list_dependants(&self) -> CoreResult<Vec<Dependant>> {
        self.party.list_dependants().await
    }

    pub async fn create_dependant(&self, new: NewDependant) -> CoreResult<Dependant> {
        validate_dependant(&new.name, new.date_of_birth)?;
        self.party.create_dependant(new, self.clock.now()).await
    }

    pub async fn update_dependant(
        &self,
        id: DependantId,
        new: NewDependant,
    ) -> CoreResult<Dependant> {
        validate_dependant(&new.name, new.date_of_birth)?;
        self.party.update_dependant(id, new).await
    }

    pub async fn delete_dependant(&self, id: DependantId) -> CoreResult<()> {
        self.party.delete_dependant(id).await
    }

    pub async fn list_agents(&self) -> CoreResult<Vec<Agent>> {
        self.party.list_agents().await
    }

    pub async fn create_agent(&self, new: NewAgent) -> CoreResult<Agent> {
        validate_agent(&new.name, &new.email)?;
        self.party.create_agent(new, self.clock.now()).await
    }

    pub async fn delete_agent(&self, id: AgentId) -> CoreResult<()> {
        self.party.delete_agent(id).await
    }

    // --- policies and premiums ---

    pub async fn list_policies(&self) -> CoreResult<Vec<Policy>> {
        self.policies.list().await
    }

    pub async fn get_policy(&self, id: PolicyId) -> CoreResult<Policy> {
        self.policies.get(id).await
    }

    pub async fn create_policy(&self, new: NewPolicy) -> CoreResult<Policy> {
        // The member must exist before cover starts.
        self.party.get_member(new.member_id).await?;
        self.policies.create(new, self.clock.now()).await
    }

    pub async fn update_policy(&self, id: PolicyId, update: PolicyUpdate) -> CoreResult<Policy> {
        self.policies.update(id, update).await
    }

    pub async fn delete_policy(&self, id: PolicyId) -> CoreResult<()> {
        self.policies.delete(id).await
    }

    pub async fn record_policy_payment(
        &self,
        policy_id: PolicyId,
        amount: Money,
    ) -> CoreResult<Payment> {
        self.ledger
            .record_payment(policy_id, amount, self.clock.now())
            .await
    }

    pub async fn policy_arrears(&self, policy_id: PolicyId) -> CoreResult<Money> {
        self.ledger.arrears(policy_id, self.clock.now()).await
    }

    pub async fn reinstate_policy(&self, policy_id: PolicyId) -> CoreResult<()> {
        self.ledger.reinstate(policy_id).await
    }

    /// Scheduled trigger: evaluates every active policy for lapse
    pub async fn run_lapse_check(&self) -> CoreResult<LapseSummary> {
        self.lapse.run_lapse_check(self.clock.now()).await
    }

    // --- claims ---

    pub async fn submit_claim(&self, new: NewClaim) -> CoreResult<Claim> {
        // Claims attach to existing policies only.
        self.policies.get(new.policy_id).await?;
        self.claims.submit(new, self.clock.now()).await
    }

    pub async fn list_claims(&self) -> CoreResult<Vec<Claim>> {
        self.claims.list().await
    }

    pub async fn get_claim(&self, id: ClaimId) -> CoreResult<Claim> {
        self.claims.get(id).await
    }

    pub async fn begin_claim_review(&self, id: ClaimId) -> CoreResult<Claim> {
        self.claims.begin_review(id, self.clock.now()).await
    }

    pub async fn approve_claim(&self, id: ClaimId) -> CoreResult<Claim> {
        self.claims.approve(id, self.clock.now()).await
    }

    pub async fn reject_claim(&self, id: ClaimId, reason: &str) -> CoreResult<Claim> {
        self.claims.reject(id, reason, self.clock.now()).await
    }

    pub async fn disburse_claim(&self, id: ClaimId, payout: Money) -> CoreResult<Claim> {
        self.claims.disburse(id, payout, self.clock.now()).await
    }

    // --- external side effects ---

    /// Stores an uploaded document, returning its opaque reference
    pub async fn store_document(&self, filename: &str, bytes: Vec<u8>) -> CoreResult<String> {
        self.documents.store(filename, bytes).await
    }

    /// Fetches the stored document behind an opaque reference
    pub async fn fetch_document(&self, reference: &str) -> CoreResult<Vec<u8>> {
        self.documents.fetch(reference).await
    }

    /// Fans out payment reminders to every member holding an active policy
    ///
    /// Delivery failures are counted and logged, never propagated.
    pub async fn send_reminders(&self) -> CoreResult<ReminderSummary> {
        let active = self.policies.list_active().await?;
        let mut member_ids: Vec<MemberId> = active.iter().map(|p| p.member_id).collect();
        member_ids.sort();
        member_ids.dedup();

        let mut summary = ReminderSummary::default();
        for member_id in member_ids {
            match self.notifications.send_reminder(member_id).await {
                Ok(()) => summary.sent += 1,
                Err(err) => {
                    summary.failed += 1;
                    warn!(member_id = %member_id, error = %err, "reminder delivery failed");
                }
            }
        }
        info!(sent = summary.sent, failed = summary.failed, "reminders dispatched");
        Ok(summary)
    }

    /// Requests a payment sync from the retail platform
    pub async fn sync_retail_payments(&self) -> CoreResult<u32> {
        let ingested = self.retail.sync_payments().await?;
        info!(ingested, "retail payment sync requested");
        Ok(ingested)
    }
}
