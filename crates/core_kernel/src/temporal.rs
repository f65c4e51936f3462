//! Clock abstraction and billing-period arithmetic
//!
//! Every date decision in the system - trial expiry, subscription expiry,
//! premium arrears - is a pure function of a supplied instant. Handlers and
//! batch jobs take the instant from a `Clock`, which lets tests pin time
//! exactly instead of sleeping or fuzzing around `Utc::now()`.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Length of one billing period, used for both the subscription window and
/// the policy premium cycle.
pub const BILLING_PERIOD_DAYS: i64 = 30;

/// One billing period as a chrono duration
pub fn billing_period() -> Duration {
    Duration::days(BILLING_PERIOD_DAYS)
}

/// Number of fully completed billing periods between `start` and `now`
///
/// A period only counts once it has entirely elapsed: a policy started
/// 10 days ago has completed zero periods, one started 65 days ago has
/// completed two. Instants before `start` yield zero.
pub fn elapsed_billing_periods(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    if now <= start {
        return 0;
    }
    let days = (now - start).num_days();
    (days / BILLING_PERIOD_DAYS) as u32
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, advanceable from tests
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += by;
    }

    /// Repins the clock to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_period_before_first_cycle_completes() {
        assert_eq!(elapsed_billing_periods(t0(), t0() + Duration::days(10)), 0);
        assert_eq!(elapsed_billing_periods(t0(), t0() + Duration::days(29)), 0);
    }

    #[test]
    fn test_period_boundary() {
        assert_eq!(elapsed_billing_periods(t0(), t0() + Duration::days(30)), 1);
        assert_eq!(elapsed_billing_periods(t0(), t0() + Duration::days(59)), 1);
        assert_eq!(elapsed_billing_periods(t0(), t0() + Duration::days(65)), 2);
    }

    #[test]
    fn test_now_before_start() {
        assert_eq!(elapsed_billing_periods(t0(), t0() - Duration::days(5)), 0);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::at(t0());
        assert_eq!(clock.now(), t0());
        clock.advance(Duration::days(31));
        assert_eq!(clock.now(), t0() + Duration::days(31));
    }
}
