//! Router-level tests against an in-memory coordinator

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use core_kernel::FixedClock;
use test_utils::fixtures::TemporalFixtures;
use domain_account::ports::mock::{MockUserStore, PlainTextVerifier};
use domain_claims::ports::mock::{MockClaimStore, MockDocumentStore};
use domain_party::ports::mock::MockPartyStore;
use domain_policy::ports::mock::{
    MockNotificationSender, MockPaymentStore, MockPolicyStore, MockRetailSync,
};
use interface_api::config::ApiConfig;
use interface_api::coordinator::{CoordinatorParts, LifecycleCoordinator};
use interface_api::create_router;

fn t0() -> DateTime<Utc> {
    TemporalFixtures::t0()
}

struct TestApp {
    server: TestServer,
    clock: Arc<FixedClock>,
}

fn spawn_app() -> TestApp {
    let clock = Arc::new(FixedClock::at(t0()));
    let coordinator = Arc::new(LifecycleCoordinator::new(CoordinatorParts {
        clock: clock.clone(),
        users: Arc::new(MockUserStore::new()),
        verifier: Arc::new(PlainTextVerifier),
        party: Arc::new(MockPartyStore::new()),
        policies: Arc::new(MockPolicyStore::new()),
        payments: Arc::new(MockPaymentStore::new()),
        claims: Arc::new(MockClaimStore::new()),
        documents: Arc::new(MockDocumentStore::new()),
        notifications: Arc::new(MockNotificationSender::new()),
        retail: Arc::new(MockRetailSync::new()),
    }));
    let server = TestServer::new(create_router(coordinator, ApiConfig::default())).unwrap();
    TestApp { server, clock }
}

async fn register_and_login(app: &TestApp) -> String {
    app.server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Thandi",
            "email": "thandi@example.com",
            "password": "correct-horse",
        }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "thandi@example.com",
            "password": "correct-horse",
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

async fn create_member(app: &TestApp, token: &str) -> String {
    let response = app
        .server
        .post("/api/members")
        .authorization_bearer(token)
        .json(&json!({
            "name": "Sipho Dlamini",
            "id_number": "8001015009087",
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn create_policy(app: &TestApp, token: &str, member_id: &str, premium: u32) -> String {
    let response = app
        .server
        .post("/api/policies")
        .authorization_bearer(token)
        .json(&json!({
            "member_id": member_id,
            "plan_type": "family",
            "cover_level": 15000,
            "premium": premium,
            "start_date": t0(),
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_starts_trial() {
    let app = spawn_app();
    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Thandi",
            "email": "thandi@example.com",
            "password": "correct-horse",
        }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["message"], "Registered, trial for 30 days.");
    assert_eq!(body["trial_ends"], "2024-01-31T00:00:00Z");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app();
    let request = json!({
        "name": "Thandi",
        "email": "thandi@example.com",
        "password": "correct-horse",
    });
    app.server
        .post("/api/auth/register")
        .json(&request)
        .await
        .assert_status_ok();

    let response = app.server.post("/api/auth/register").json(&request).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_expired_trial_blocks_login_with_reason() {
    let app = spawn_app();
    register_and_login(&app).await;

    app.clock.advance(Duration::days(31));
    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "thandi@example.com",
            "password": "correct-horse",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["reason"], "trial_expired");
    assert_eq!(body["message"], "Trial expired. Pay R300 to continue.");
}

#[tokio::test]
async fn test_subscription_payment_restores_access() {
    let app = spawn_app();
    let register = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Thandi",
            "email": "thandi@example.com",
            "password": "correct-horse",
        }))
        .await;
    let user_id = register.json::<Value>()["user"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.clock.advance(Duration::days(31));

    // No token needed: a locked-out user must still be able to pay.
    app.server
        .post("/api/subscription/pay")
        .json(&json!({ "user_id": user_id, "reference": "PAYREF-1" }))
        .await
        .assert_status_ok();

    app.server
        .post("/api/auth/login")
        .json(&json!({
            "email": "thandi@example.com",
            "password": "correct-horse",
        }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app();
    let response = app.server.get("/api/members").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_crud_round_trip() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;

    let list = app
        .server
        .get("/api/members")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Value>>();
    assert_eq!(list.len(), 1);

    app.server
        .put(&format!("/api/members/{member_id}"))
        .authorization_bearer(&token)
        .json(&json!({
            "name": "Sipho Dlamini",
            "id_number": "8001015009087",
            "address": "12 Vilakazi Street",
        }))
        .await
        .assert_status_ok();

    app.server
        .delete(&format!("/api/members/{member_id}"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let list = app
        .server
        .get("/api/members")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Value>>();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_policy_requires_existing_member() {
    let app = spawn_app();
    let token = register_and_login(&app).await;

    let response = app
        .server
        .post("/api/policies")
        .authorization_bearer(&token)
        .json(&json!({
            "member_id": uuid::Uuid::new_v4(),
            "plan_type": "single",
            "cover_level": 10000,
            "premium": 100,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_policy_start_date_defaults_to_creation_instant() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;

    app.clock.advance(Duration::days(3));
    let response = app
        .server
        .post("/api/policies")
        .authorization_bearer(&token)
        .json(&json!({
            "member_id": member_id,
            "plan_type": "single",
            "cover_level": 10000,
            "premium": 100,
        }))
        .await;
    response.assert_status_ok();

    // No start_date in the request: cover starts at the clock's now.
    let policy = response.json::<Value>();
    assert_eq!(policy["start_date"], "2024-01-04T00:00:00Z");
}

#[tokio::test]
async fn test_premium_payment_reduces_arrears() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;
    let policy_id = create_policy(&app, &token, &member_id, 100).await;

    // Two billing periods elapse with nothing paid.
    app.clock.advance(Duration::days(65));

    app.server
        .post("/api/payments")
        .authorization_bearer(&token)
        .json(&json!({ "policy_id": policy_id, "amount": 100 }))
        .await
        .assert_status_ok();

    let arrears = app
        .server
        .get(&format!("/api/policies/{policy_id}/arrears"))
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(arrears["arrears"], "100");
}

#[tokio::test]
async fn test_lapse_run_lapses_overdue_policy() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;
    let policy_id = create_policy(&app, &token, &member_id, 100).await;

    app.clock.advance(Duration::days(65));

    let summary = app
        .server
        .post("/api/lapse/run")
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(summary["evaluated"], 1);
    assert_eq!(summary["lapsed"], 1);

    let policy = app
        .server
        .get(&format!("/api/policies/{policy_id}"))
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(policy["status"], "Lapsed");
}

#[tokio::test]
async fn test_claim_lifecycle_over_http() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;
    let policy_id = create_policy(&app, &token, &member_id, 100).await;

    let certificate = app
        .server
        .post("/api/documents/death_certificate.pdf")
        .authorization_bearer(&token)
        .bytes(b"certificate".to_vec().into())
        .await
        .json::<Value>()["reference"]
        .as_str()
        .unwrap()
        .to_string();
    let affidavit = app
        .server
        .post("/api/documents/affidavit.pdf")
        .authorization_bearer(&token)
        .bytes(b"affidavit".to_vec().into())
        .await
        .json::<Value>()["reference"]
        .as_str()
        .unwrap()
        .to_string();

    let claim = app
        .server
        .post("/api/claims")
        .authorization_bearer(&token)
        .json(&json!({
            "policy_id": policy_id,
            "death_certificate": certificate,
            "affidavit": affidavit,
        }))
        .await
        .json::<Value>();
    assert_eq!(claim["status"], "Submitted");
    let claim_id = claim["id"].as_str().unwrap().to_string();

    app.server
        .post(&format!("/api/claims/{claim_id}/review"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    app.server
        .post(&format!("/api/claims/{claim_id}/approve"))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let paid = app
        .server
        .post(&format!("/api/claims/{claim_id}/disburse"))
        .authorization_bearer(&token)
        .json(&json!({ "payout": 15000 }))
        .await
        .json::<Value>();
    assert_eq!(paid["status"], "Paid");
    assert_eq!(paid["payout_amount"], "15000");

    // Paid is terminal.
    let response = app
        .server
        .post(&format!("/api/claims/{claim_id}/review"))
        .authorization_bearer(&token)
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_claim_for_unknown_policy_not_found() {
    let app = spawn_app();
    let token = register_and_login(&app).await;

    let response = app
        .server
        .post("/api/claims")
        .authorization_bearer(&token)
        .json(&json!({
            "policy_id": uuid::Uuid::new_v4(),
            "death_certificate": "ref-1",
            "affidavit": "ref-2",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reinstatement_not_implemented() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;
    let policy_id = create_policy(&app, &token, &member_id, 100).await;

    let response = app
        .server
        .post(&format!("/api/policies/{policy_id}/reinstate"))
        .authorization_bearer(&token)
        .await;
    response.assert_status(axum::http::StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_report_envelope() {
    let app = spawn_app();
    let token = register_and_login(&app).await;

    let body = app
        .server
        .get("/api/reports/claims")
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(body["report"], "claims");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_payment_webhook_routes_premiums() {
    let app = spawn_app();
    let token = register_and_login(&app).await;
    let member_id = create_member(&app, &token).await;
    let policy_id = create_policy(&app, &token, &member_id, 100).await;

    app.server
        .post("/api/payments/webhook")
        .json(&json!({
            "kind": "premium",
            "policy_id": policy_id,
            "amount": 100,
        }))
        .await
        .assert_status_ok();

    let arrears = app
        .server
        .get(&format!("/api/policies/{policy_id}/arrears"))
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(arrears["arrears"], "0");
}
