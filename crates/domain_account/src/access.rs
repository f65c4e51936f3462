//! Access state evaluation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::AccessDeniedReason;

use crate::user::User;

/// A user's access state at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    TrialActive,
    TrialExpired,
    PaidActive,
    PaidExpired,
}

impl AccessState {
    /// Returns true if the user is permitted to act
    pub fn is_active(&self) -> bool {
        matches!(self, AccessState::TrialActive | AccessState::PaidActive)
    }

    /// The denial reason to surface when this state is not active
    pub fn denial_reason(&self) -> Option<AccessDeniedReason> {
        match self {
            AccessState::TrialExpired => Some(AccessDeniedReason::TrialExpired),
            AccessState::PaidExpired => Some(AccessDeniedReason::SubscriptionExpired),
            _ => None,
        }
    }
}

/// Derives the access state from stored facts and the current instant
///
/// Active iff an expiry is set and lies strictly in the future; an expiry
/// equal to `now` is already expired. Which pair of variants applies is
/// decided by `has_paid` alone.
pub fn evaluate_access(user: &User, now: DateTime<Utc>) -> AccessState {
    let active = user
        .subscription_expiry
        .map(|expiry| expiry > now)
        .unwrap_or(false);

    match (user.has_paid, active) {
        (false, true) => AccessState::TrialActive,
        (false, false) => AccessState::TrialExpired,
        (true, true) => AccessState::PaidActive,
        (true, false) => AccessState::PaidExpired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_kernel::UserId;

    fn user_with_expiry(expiry: Option<DateTime<Utc>>, has_paid: bool) -> User {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut user = User::new(UserId::new(), "Thandi", "thandi@example.com", "cred", t0);
        user.subscription_expiry = expiry;
        user.has_paid = has_paid;
        user
    }

    #[test]
    fn test_no_expiry_is_expired() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let state = evaluate_access(&user_with_expiry(None, false), now);
        assert_eq!(state, AccessState::TrialExpired);
        assert!(!state.is_active());
    }

    #[test]
    fn test_expiry_equal_to_now_is_not_active() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let state = evaluate_access(&user_with_expiry(Some(now), false), now);
        assert_eq!(state, AccessState::TrialExpired);
    }

    #[test]
    fn test_future_expiry_active() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let expiry = now + Duration::days(1);
        assert_eq!(
            evaluate_access(&user_with_expiry(Some(expiry), false), now),
            AccessState::TrialActive
        );
        assert_eq!(
            evaluate_access(&user_with_expiry(Some(expiry), true), now),
            AccessState::PaidActive
        );
    }

    #[test]
    fn test_denial_reason_distinguishes_trial_from_paid() {
        assert_eq!(
            AccessState::TrialExpired.denial_reason(),
            Some(core_kernel::AccessDeniedReason::TrialExpired)
        );
        assert_eq!(
            AccessState::PaidExpired.denial_reason(),
            Some(core_kernel::AccessDeniedReason::SubscriptionExpired)
        );
        assert_eq!(AccessState::TrialActive.denial_reason(), None);
    }
}
