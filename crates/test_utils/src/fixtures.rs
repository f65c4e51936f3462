//! Pre-built test fixtures

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::Money;
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

/// The reference instant every deterministic test starts from
static T0: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The subscription price
    pub fn r300() -> Money {
        Money::new(dec!(300)).unwrap()
    }

    /// A typical monthly premium
    pub fn premium_100() -> Money {
        Money::new(dec!(100)).unwrap()
    }

    /// A typical cover level
    pub fn cover_15000() -> Money {
        Money::new(dec!(15000)).unwrap()
    }

    pub fn zero() -> Money {
        Money::zero()
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Midnight, 1 January 2024 UTC
    pub fn t0() -> DateTime<Utc> {
        *T0
    }

    /// `t0` shifted forward by whole days
    pub fn t0_plus_days(days: i64) -> DateTime<Utc> {
        *T0 + Duration::days(days)
    }

    /// Just inside the 30-day trial
    pub fn within_trial() -> DateTime<Utc> {
        Self::t0_plus_days(29)
    }

    /// Just past the 30-day trial
    pub fn after_trial() -> DateTime<Utc> {
        Self::t0_plus_days(31)
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn email() -> &'static str {
        "thandi@example.com"
    }

    pub fn member_name() -> &'static str {
        "Sipho Dlamini"
    }

    /// A syntactically plausible South African ID number
    pub fn id_number() -> &'static str {
        "8001015009087"
    }

    pub fn plan_type() -> &'static str {
        "family"
    }
}
