//! Claims domain ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, CoreError, CoreResult, PolicyId};

use crate::claim::Claim;

/// Data for submitting a claim
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub policy_id: PolicyId,
    pub death_certificate: String,
    pub affidavit: String,
}

/// Persistence port for claims
#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn get(&self, id: ClaimId) -> CoreResult<Claim>;
    async fn list(&self) -> CoreResult<Vec<Claim>>;
    async fn list_by_policy(&self, policy_id: PolicyId) -> CoreResult<Vec<Claim>>;
    async fn create(&self, new: NewClaim, now: DateTime<Utc>) -> CoreResult<Claim>;

    /// Persists the claim's current state; the id must already exist
    async fn save(&self, claim: &Claim) -> CoreResult<()>;
}

/// File storage collaborator for supporting documents
///
/// Produces opaque references; the workflow never inspects content. This
/// keeps multipart upload mechanics out of the state machine.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores the bytes and returns an opaque reference
    async fn store(&self, filename: &str, bytes: Vec<u8>) -> CoreResult<String>;

    /// Retrieves the bytes behind a reference
    async fn fetch(&self, reference: &str) -> CoreResult<Vec<u8>>;
}

/// In-memory implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use crate::claim::ClaimStatus;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct MockClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl MockClaimStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ClaimStore for MockClaimStore {
        async fn get(&self, id: ClaimId) -> CoreResult<Claim> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Claim", id))
        }

        async fn list(&self) -> CoreResult<Vec<Claim>> {
            Ok(self.claims.read().await.values().cloned().collect())
        }

        async fn list_by_policy(&self, policy_id: PolicyId) -> CoreResult<Vec<Claim>> {
            Ok(self
                .claims
                .read()
                .await
                .values()
                .filter(|c| c.policy_id == policy_id)
                .cloned()
                .collect())
        }

        async fn create(&self, new: NewClaim, now: DateTime<Utc>) -> CoreResult<Claim> {
            let claim = Claim {
                id: ClaimId::new_v7(),
                policy_id: new.policy_id,
                death_certificate: new.death_certificate,
                affidavit: new.affidavit,
                status: ClaimStatus::Submitted,
                reject_reason: None,
                payout_amount: None,
                submitted_at: now,
                updated_at: now,
            };
            self.claims.write().await.insert(claim.id, claim.clone());
            Ok(claim)
        }

        async fn save(&self, claim: &Claim) -> CoreResult<()> {
            let mut claims = self.claims.write().await;
            if !claims.contains_key(&claim.id) {
                return Err(CoreError::not_found("Claim", claim.id));
            }
            claims.insert(claim.id, claim.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct MockDocumentStore {
        documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    }

    impl MockDocumentStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        async fn store(&self, filename: &str, bytes: Vec<u8>) -> CoreResult<String> {
            let reference = format!("uploads/{}-{}", uuid::Uuid::new_v4().simple(), filename);
            self.documents
                .write()
                .await
                .insert(reference.clone(), bytes);
            Ok(reference)
        }

        async fn fetch(&self, reference: &str) -> CoreResult<Vec<u8>> {
            self.documents
                .read()
                .await
                .get(reference)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Document", reference))
        }
    }
}
