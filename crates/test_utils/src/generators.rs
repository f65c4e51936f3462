//! Property-based strategies and fake-data helpers

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::Money;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;

/// Strategy for positive amounts in cents
pub fn positive_cents_strategy() -> impl Strategy<Value = u64> {
    1u64..100_000_000u64
}

/// Strategy for `Money` values, zero included
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (0u64..100_000_000u64).prop_map(Money::from_cents)
}

/// Strategy for positive `Money` values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_cents_strategy().prop_map(Money::from_cents)
}

/// Strategy for instants within a few years of the fixture epoch
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..2000i64).prop_map(|days| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
    })
}

/// A random plausible display name
pub fn fake_name() -> String {
    Name().fake()
}

/// A random well-formed email, unique enough for store tests
pub fn fake_email() -> String {
    SafeEmail().fake()
}

/// A random 13-digit ID number
pub fn fake_id_number() -> String {
    use fake::faker::number::en::NumberWithFormat;
    NumberWithFormat("#############").fake()
}
