//! Account lifecycle scenarios

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use core_kernel::FixedClock;
use domain_account::ports::mock::{MockUserStore, PlainTextVerifier};
use domain_account::{AccessState, AccountService};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn service(clock: Arc<FixedClock>) -> AccountService {
    AccountService::new(
        clock,
        Arc::new(MockUserStore::new()),
        Arc::new(PlainTextVerifier),
    )
}

#[tokio::test]
async fn trial_window_boundaries() {
    let clock = Arc::new(FixedClock::at(t0()));
    let service = service(clock.clone());

    let user = service
        .register("A", "a@example.com", "pass")
        .await
        .unwrap();

    clock.set(t0() + Duration::days(29));
    assert_eq!(
        service.access_state(user.id).await.unwrap(),
        AccessState::TrialActive
    );

    clock.set(t0() + Duration::days(31));
    assert_eq!(
        service.access_state(user.id).await.unwrap(),
        AccessState::TrialExpired
    );
}

#[tokio::test]
async fn expiry_exactly_now_is_expired() {
    let clock = Arc::new(FixedClock::at(t0()));
    let service = service(clock.clone());

    let user = service
        .register("A", "a@example.com", "pass")
        .await
        .unwrap();

    // The trial ends at exactly t0 + 30 days; at that instant access is gone.
    clock.set(t0() + Duration::days(30));
    assert_eq!(
        service.access_state(user.id).await.unwrap(),
        AccessState::TrialExpired
    );
}

#[tokio::test]
async fn payment_flips_state_to_paid() {
    let clock = Arc::new(FixedClock::at(t0()));
    let service = service(clock.clone());

    let user = service
        .register("A", "a@example.com", "pass")
        .await
        .unwrap();

    clock.set(t0() + Duration::days(40));
    assert_eq!(
        service.access_state(user.id).await.unwrap(),
        AccessState::TrialExpired
    );

    service
        .apply_subscription_payment(user.id, "REF-001")
        .await
        .unwrap();
    assert_eq!(
        service.access_state(user.id).await.unwrap(),
        AccessState::PaidActive
    );

    clock.advance(Duration::days(31));
    assert_eq!(
        service.access_state(user.id).await.unwrap(),
        AccessState::PaidExpired
    );
}

#[tokio::test]
async fn payment_extension_is_always_thirty_days_from_now() {
    let clock = Arc::new(FixedClock::at(t0()));
    let service = service(clock.clone());

    let user = service
        .register("A", "a@example.com", "pass")
        .await
        .unwrap();

    // Two payments at the same instant leave the same expiry.
    let first = service
        .apply_subscription_payment(user.id, "REF-001")
        .await
        .unwrap();
    let second = service
        .apply_subscription_payment(user.id, "REF-002")
        .await
        .unwrap();
    assert_eq!(first.subscription_expiry, second.subscription_expiry);
    assert_eq!(first.subscription_expiry, Some(t0() + Duration::days(30)));
}
