//! Policy and payment records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{MemberId, Money, PaymentId, PolicyId};

/// Policy lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyStatus {
    /// Cover is in force
    Active,
    /// Lapsed through sustained missed premiums
    Lapsed,
    /// Cancelled by the scheme or the member
    Cancelled,
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Lapsed => "Lapsed",
            PolicyStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

/// A funeral cover policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    /// Owning member
    pub member_id: MemberId,
    /// Product plan (e.g. "single", "family")
    pub plan_type: String,
    /// Benefit paid out on a successful claim
    pub cover_level: Money,
    /// Premium per 30-day billing period; zero is allowed for promotional cover
    pub premium: Money,
    /// Start of the first billing period
    pub start_date: DateTime<Utc>,
    pub status: PolicyStatus,
    pub created_at: DateTime<Utc>,
}

/// An immutable premium payment ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub policy_id: PolicyId,
    pub amount: Money,
    pub paid_at: DateTime<Utc>,
}
