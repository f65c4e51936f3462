//! Claims lifecycle tests

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;

use core_kernel::{Money, PolicyId};
use domain_claims::ports::mock::{MockClaimStore, MockDocumentStore};
use domain_claims::{ClaimStatus, ClaimsWorkflow, DocumentStore, NewClaim};
use test_utils::assertions::{assert_invalid_argument, assert_invalid_transition};
use test_utils::builders::TestClaimBuilder;

fn workflow() -> ClaimsWorkflow {
    ClaimsWorkflow::new(Arc::new(MockClaimStore::new()))
}

#[tokio::test]
async fn test_uploaded_documents_back_a_submission() {
    let documents = MockDocumentStore::new();
    let cert_ref = documents
        .store("death-certificate.pdf", b"certificate bytes".to_vec())
        .await
        .unwrap();
    let affidavit_ref = documents
        .store("affidavit.pdf", b"affidavit bytes".to_vec())
        .await
        .unwrap();

    let workflow = workflow();
    let claim = workflow
        .submit(
            NewClaim {
                policy_id: PolicyId::new(),
                death_certificate: cert_ref.clone(),
                affidavit: affidavit_ref,
            },
            Utc::now(),
        )
        .await
        .unwrap();

    assert_eq!(claim.status, ClaimStatus::Submitted);
    // The reference stays resolvable for later download.
    let bytes = documents.fetch(&cert_ref).await.unwrap();
    assert_eq!(bytes, b"certificate bytes");
}

#[tokio::test]
async fn test_fetch_unknown_document_is_not_found() {
    let documents = MockDocumentStore::new();
    let err = documents.fetch("uploads/nope.pdf").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_terminal_states_reject_every_event() {
    let workflow = workflow();
    let now = Utc::now();
    let payout = Money::new(dec!(10000)).unwrap();

    let claim = workflow
        .submit(
            NewClaim {
                policy_id: PolicyId::new(),
                death_certificate: "uploads/cert.pdf".into(),
                affidavit: "uploads/affidavit.pdf".into(),
            },
            now,
        )
        .await
        .unwrap();
    workflow.begin_review(claim.id, now).await.unwrap();
    workflow.approve(claim.id, now).await.unwrap();
    workflow.disburse(claim.id, payout, now).await.unwrap();

    assert_invalid_transition(workflow.begin_review(claim.id, now).await);
    assert_invalid_transition(workflow.approve(claim.id, now).await);
    assert_invalid_transition(workflow.reject(claim.id, "too late", now).await);
    assert_invalid_transition(workflow.disburse(claim.id, payout, now).await);
}

#[test]
fn test_review_requires_both_documents() {
    let mut claim = TestClaimBuilder::new().without_affidavit().build();
    assert_invalid_argument(claim.begin_review(Utc::now()));
}

#[tokio::test]
async fn test_claims_listed_by_policy() {
    let workflow = workflow();
    let now = Utc::now();
    let policy_id = PolicyId::new();

    for _ in 0..2 {
        workflow
            .submit(
                NewClaim {
                    policy_id,
                    death_certificate: "uploads/cert.pdf".into(),
                    affidavit: "uploads/affidavit.pdf".into(),
                },
                now,
            )
            .await
            .unwrap();
    }
    workflow
        .submit(
            NewClaim {
                policy_id: PolicyId::new(),
                death_certificate: "uploads/cert.pdf".into(),
                affidavit: "uploads/affidavit.pdf".into(),
            },
            now,
        )
        .await
        .unwrap();

    assert_eq!(workflow.list_by_policy(policy_id).await.unwrap().len(), 2);
    assert_eq!(workflow.list().await.unwrap().len(), 3);
}
