//! Account domain ports
//!
//! `UserStore` is the persistence boundary for user records; the database
//! adapter lives in infra_db and an in-memory mock is provided here for
//! tests. `CredentialVerifier` abstracts password hashing so the core
//! never sees a plaintext scheme.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{CoreError, CoreResult, UserId};

use crate::user::User;

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub credential_ref: String,
}

/// Partial update applied by the account tracker
///
/// Only the fields the tracker mutates - identity fields never change
/// through this path.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub subscription_expiry: Option<DateTime<Utc>>,
    pub has_paid: Option<bool>,
}

/// Persistence port for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Retrieves a user by ID, `NotFound` if absent
    async fn get(&self, id: UserId) -> CoreResult<User>;

    /// Finds a user by login email
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    /// Creates a user, `DuplicateKey` on an existing email
    async fn create(&self, new_user: NewUser, now: DateTime<Utc>) -> CoreResult<User>;

    /// Applies a partial update, `NotFound` if absent
    async fn update(&self, id: UserId, update: UserUpdate) -> CoreResult<User>;
}

/// Credential hashing collaborator (external)
pub trait CredentialVerifier: Send + Sync {
    /// Hashes a password into an opaque credential reference
    fn hash(&self, password: &str) -> CoreResult<String>;

    /// Verifies a password against a stored credential reference
    fn verify(&self, password: &str, credential_ref: &str) -> CoreResult<bool>;
}

/// In-memory implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of UserStore
    #[derive(Debug, Default)]
    pub struct MockUserStore {
        users: Arc<RwLock<HashMap<UserId, User>>>,
    }

    impl MockUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with users for testing
        pub async fn with_users(users: Vec<User>) -> Self {
            let store = Self::new();
            for user in users {
                store.users.write().await.insert(user.id, user);
            }
            store
        }
    }

    #[async_trait]
    impl UserStore for MockUserStore {
        async fn get(&self, id: UserId) -> CoreResult<User> {
            self.users
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("User", id))
        }

        async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn create(&self, new_user: NewUser, now: DateTime<Utc>) -> CoreResult<User> {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.email == new_user.email) {
                return Err(CoreError::duplicate_key("email"));
            }
            let user = User::new(
                UserId::new_v7(),
                new_user.name,
                new_user.email,
                new_user.credential_ref,
                now,
            );
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn update(&self, id: UserId, update: UserUpdate) -> CoreResult<User> {
            let mut users = self.users.write().await;
            let user = users
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found("User", id))?;

            if let Some(expiry) = update.subscription_expiry {
                user.subscription_expiry = Some(expiry);
            }
            if let Some(has_paid) = update.has_paid {
                user.has_paid = has_paid;
            }
            Ok(user.clone())
        }
    }

    /// Verifier that stores passwords as-is, for tests only
    #[derive(Debug, Default)]
    pub struct PlainTextVerifier;

    impl CredentialVerifier for PlainTextVerifier {
        fn hash(&self, password: &str) -> CoreResult<String> {
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, password: &str, credential_ref: &str) -> CoreResult<bool> {
            Ok(credential_ref == format!("plain:{password}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockUserStore;
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_mock_store_create_and_get() {
        let store = MockUserStore::new();
        let user = store
            .create(
                NewUser {
                    name: "Thandi".into(),
                    email: "thandi@example.com".into(),
                    credential_ref: "cred".into(),
                },
                t0(),
            )
            .await
            .unwrap();

        let fetched = store.get(user.id).await.unwrap();
        assert_eq!(fetched.email, "thandi@example.com");
        assert!(fetched.subscription_expiry.is_none());
        assert!(!fetched.has_paid);
    }

    #[tokio::test]
    async fn test_mock_store_duplicate_email() {
        let store = MockUserStore::new();
        let new_user = NewUser {
            name: "Thandi".into(),
            email: "thandi@example.com".into(),
            credential_ref: "cred".into(),
        };
        store.create(new_user.clone(), t0()).await.unwrap();
        let err = store.create(new_user, t0()).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_mock_store_not_found() {
        let store = MockUserStore::new();
        let err = store.get(UserId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
