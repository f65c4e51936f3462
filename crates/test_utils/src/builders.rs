//! Test data builders
//!
//! Builders start from the fixture defaults; tests override only the
//! fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, MemberId, Money, PolicyId, UserId};
use domain_account::User;
use domain_claims::{Claim, ClaimStatus};
use domain_party::Member;
use domain_policy::{Policy, PolicyStatus};

use crate::fixtures::{MoneyFixtures, StringFixtures, TemporalFixtures};

pub struct TestUserBuilder {
    name: String,
    email: String,
    credential_ref: String,
    subscription_expiry: Option<DateTime<Utc>>,
    has_paid: bool,
    created_at: DateTime<Utc>,
}

impl Default for TestUserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUserBuilder {
    pub fn new() -> Self {
        Self {
            name: "Thandi Nkosi".into(),
            email: StringFixtures::email().into(),
            credential_ref: "plain:password1".into(),
            subscription_expiry: None,
            has_paid: false,
            created_at: TemporalFixtures::t0(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Gives the user an access window ending at `expiry`
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.subscription_expiry = Some(expiry);
        self
    }

    pub fn paid(mut self) -> Self {
        self.has_paid = true;
        self
    }

    /// A user mid-trial at `t0`: expiry 30 days out, never paid
    pub fn on_trial(self) -> Self {
        self.with_expiry(TemporalFixtures::t0_plus_days(30))
    }

    pub fn build(self) -> User {
        User {
            id: UserId::new_v7(),
            name: self.name,
            email: self.email,
            credential_ref: self.credential_ref,
            subscription_expiry: self.subscription_expiry,
            has_paid: self.has_paid,
            created_at: self.created_at,
        }
    }
}

pub struct TestMemberBuilder {
    name: String,
    id_number: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl Default for TestMemberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMemberBuilder {
    pub fn new() -> Self {
        Self {
            name: StringFixtures::member_name().into(),
            id_number: StringFixtures::id_number().into(),
            address: None,
            created_at: TemporalFixtures::t0(),
        }
    }

    pub fn with_id_number(mut self, id_number: impl Into<String>) -> Self {
        self.id_number = id_number.into();
        self
    }

    pub fn build(self) -> Member {
        Member {
            id: MemberId::new_v7(),
            name: self.name,
            id_number: self.id_number,
            address: self.address,
            created_at: self.created_at,
        }
    }
}

pub struct TestPolicyBuilder {
    member_id: MemberId,
    plan_type: String,
    cover_level: Money,
    premium: Money,
    start_date: DateTime<Utc>,
    status: PolicyStatus,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    pub fn new() -> Self {
        Self {
            member_id: MemberId::new_v7(),
            plan_type: StringFixtures::plan_type().into(),
            cover_level: MoneyFixtures::cover_15000(),
            premium: MoneyFixtures::premium_100(),
            start_date: TemporalFixtures::t0(),
            status: PolicyStatus::Active,
        }
    }

    pub fn with_member(mut self, member_id: MemberId) -> Self {
        self.member_id = member_id;
        self
    }

    pub fn with_premium(mut self, premium: Money) -> Self {
        self.premium = premium;
        self
    }

    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = start;
        self
    }

    pub fn lapsed(mut self) -> Self {
        self.status = PolicyStatus::Lapsed;
        self
    }

    pub fn build(self) -> Policy {
        Policy {
            id: PolicyId::new_v7(),
            member_id: self.member_id,
            plan_type: self.plan_type,
            cover_level: self.cover_level,
            premium: self.premium,
            start_date: self.start_date,
            status: self.status,
            created_at: self.start_date,
        }
    }
}

pub struct TestClaimBuilder {
    policy_id: PolicyId,
    death_certificate: String,
    affidavit: String,
    status: ClaimStatus,
    submitted_at: DateTime<Utc>,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    pub fn new() -> Self {
        Self {
            policy_id: PolicyId::new_v7(),
            death_certificate: "uploads/death-certificate.pdf".into(),
            affidavit: "uploads/affidavit.pdf".into(),
            status: ClaimStatus::Submitted,
            submitted_at: TemporalFixtures::t0(),
        }
    }

    pub fn with_policy(mut self, policy_id: PolicyId) -> Self {
        self.policy_id = policy_id;
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn without_affidavit(mut self) -> Self {
        self.affidavit = String::new();
        self
    }

    pub fn build(self) -> Claim {
        Claim {
            id: ClaimId::new_v7(),
            policy_id: self.policy_id,
            death_certificate: self.death_certificate,
            affidavit: self.affidavit,
            status: self.status,
            reject_reason: None,
            payout_amount: None,
            submitted_at: self.submitted_at,
            updated_at: self.submitted_at,
        }
    }
}
