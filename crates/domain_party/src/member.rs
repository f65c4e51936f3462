//! Member and dependant records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DependantId, MemberId};

/// A policyholder
///
/// The member is the aggregate root for dependants and policies. The
/// government ID number is unique across the scheme; the store enforces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Government-issued ID number, unique
    pub id_number: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        id_number: impl Into<String>,
        address: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            id_number: id_number.into(),
            address,
            created_at: now,
        }
    }
}

/// A dependant covered under a member's policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependant {
    pub id: DependantId,
    /// Owning member
    pub member_id: MemberId,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Dependant {
    pub fn new(
        id: DependantId,
        member_id: MemberId,
        name: impl Into<String>,
        date_of_birth: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id,
            name: name.into(),
            date_of_birth,
            created_at: now,
        }
    }
}
