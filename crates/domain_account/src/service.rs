//! Account state tracker service

use std::sync::Arc;

use tracing::info;

use core_kernel::{billing_period, Clock, CoreError, CoreResult, UserId};

use crate::access::{evaluate_access, AccessState};
use crate::ports::{CredentialVerifier, NewUser, UserStore, UserUpdate};
use crate::user::User;

/// Orchestrates registration, login gating and subscription payments
///
/// All date decisions go through the injected clock so the whole lifecycle
/// is testable at fixed instants.
pub struct AccountService {
    clock: Arc<dyn Clock>,
    users: Arc<dyn UserStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AccountService {
    pub fn new(
        clock: Arc<dyn Clock>,
        users: Arc<dyn UserStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            clock,
            users,
            verifier,
        }
    }

    /// Registers a user and starts their 30-day trial
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on empty fields, `DuplicateKey` on an email
    /// already in use.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> CoreResult<User> {
        if name.trim().is_empty() {
            return Err(CoreError::invalid_argument_field("name is required", "name"));
        }
        if email.trim().is_empty() {
            return Err(CoreError::invalid_argument_field("email is required", "email"));
        }
        if password.is_empty() {
            return Err(CoreError::invalid_argument_field(
                "password is required",
                "password",
            ));
        }

        let credential_ref = self.verifier.hash(password)?;
        let now = self.clock.now();
        let user = self
            .users
            .create(
                NewUser {
                    name: name.to_string(),
                    email: email.to_string(),
                    credential_ref,
                },
                now,
            )
            .await?;

        let user = self.start_trial(user.id).await?;
        info!(user_id = %user.id, trial_ends = ?user.subscription_expiry, "user registered");
        Ok(user)
    }

    /// Sets the access window to 30 days from now for a freshly registered user
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn start_trial(&self, user_id: UserId) -> CoreResult<User> {
        let expiry = self.clock.now() + billing_period();
        self.users
            .update(
                user_id,
                UserUpdate {
                    subscription_expiry: Some(expiry),
                    has_paid: None,
                },
            )
            .await
    }

    /// Verifies credentials and gates on access state
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for unknown email or wrong password (the two are
    /// indistinguishable to the caller), `AccessDenied` when the trial or
    /// subscription has lapsed - carrying which, so the client can route
    /// to the right payment prompt.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::invalid_argument("email and password are required"));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| CoreError::invalid_argument("Invalid credentials"))?;

        if !self.verifier.verify(password, &user.credential_ref)? {
            return Err(CoreError::invalid_argument("Invalid credentials"));
        }

        let state = evaluate_access(&user, self.clock.now());
        match state.denial_reason() {
            None => Ok(user),
            Some(reason) => Err(CoreError::access_denied(reason)),
        }
    }

    /// Evaluates a user's access state at the current instant
    pub async fn access_state(&self, user_id: UserId) -> CoreResult<AccessState> {
        let user = self.users.get(user_id).await?;
        Ok(evaluate_access(&user, self.clock.now()))
    }

    /// Records a subscription payment and extends access
    ///
    /// The expiry is reset to exactly 30 days from now - it does not stack
    /// on remaining trial or subscription time. That mirrors the historical
    /// behaviour of this system; see DESIGN.md before changing it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the payment reference is empty, `NotFound`
    /// for an unknown user.
    pub async fn apply_subscription_payment(
        &self,
        user_id: UserId,
        reference: &str,
    ) -> CoreResult<User> {
        if reference.trim().is_empty() {
            return Err(CoreError::invalid_argument_field(
                "payment reference is required",
                "reference",
            ));
        }

        let now = self.clock.now();
        let user = self
            .users
            .update(
                user_id,
                UserUpdate {
                    subscription_expiry: Some(now + billing_period()),
                    has_paid: Some(true),
                },
            )
            .await?;

        info!(user_id = %user.id, new_expiry = ?user.subscription_expiry, "subscription payment recorded");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{MockUserStore, PlainTextVerifier};
    use chrono::{Duration, TimeZone, Utc};
    use core_kernel::{AccessDeniedReason, FixedClock};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn service_at(clock: Arc<FixedClock>) -> AccountService {
        AccountService::new(
            clock,
            Arc::new(MockUserStore::new()),
            Arc::new(PlainTextVerifier),
        )
    }

    #[tokio::test]
    async fn test_registration_starts_trial() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock.clone());

        let user = service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        assert_eq!(user.subscription_expiry, Some(t0() + Duration::days(30)));
        assert!(!user.has_paid);
    }

    #[tokio::test]
    async fn test_login_within_trial() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock.clone());
        service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        clock.advance(Duration::days(29));
        let user = service.login("thandi@example.com", "hunter2").await.unwrap();
        assert_eq!(user.email, "thandi@example.com");
    }

    #[tokio::test]
    async fn test_login_after_trial_expiry_names_the_trial() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock.clone());
        service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        clock.advance(Duration::days(31));
        let err = service
            .login("thandi@example.com", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::AccessDenied {
                reason: AccessDeniedReason::TrialExpired
            }
        ));
    }

    #[tokio::test]
    async fn test_login_after_subscription_expiry_names_the_subscription() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock.clone());
        let user = service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        service
            .apply_subscription_payment(user.id, "PAYREF-1")
            .await
            .unwrap();
        clock.advance(Duration::days(31));

        let err = service
            .login("thandi@example.com", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::AccessDenied {
                reason: AccessDeniedReason::SubscriptionExpired
            }
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock);
        service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        let err = service
            .login("thandi@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_payment_resets_rather_than_stacks() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock.clone());
        let user = service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        // Pay with 20 days of trial remaining: expiry becomes now + 30,
        // not trial end + 30.
        clock.advance(Duration::days(10));
        let updated = service
            .apply_subscription_payment(user.id, "PAYREF-1")
            .await
            .unwrap();
        assert_eq!(
            updated.subscription_expiry,
            Some(t0() + Duration::days(10) + Duration::days(30))
        );
        assert!(updated.has_paid);
    }

    #[tokio::test]
    async fn test_payment_requires_reference_every_time() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock);
        let user = service
            .register("Thandi", "thandi@example.com", "hunter2")
            .await
            .unwrap();

        for _ in 0..2 {
            let err = service
                .apply_subscription_payment(user.id, "  ")
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument { .. }));
        }
    }

    #[tokio::test]
    async fn test_start_trial_unknown_user() {
        let clock = Arc::new(FixedClock::at(t0()));
        let service = service_at(clock);
        let err = service.start_trial(UserId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
