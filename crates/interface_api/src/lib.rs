//! HTTP API layer
//!
//! The REST surface over the lifecycle coordinator, built on Axum.
//!
//! - **Handlers**: request handlers per domain
//! - **Middleware**: bearer-token auth and audit logging
//! - **DTOs**: request/response shapes with validation
//! - **Coordinator**: sequences domain services; owns no business rules

pub mod auth;
pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::coordinator::LifecycleCoordinator;
use crate::handlers::{auth as auth_handlers, claims, health, operations, party, policy};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<LifecycleCoordinator>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(coordinator: Arc<LifecycleCoordinator>, config: ApiConfig) -> Router {
    let state = AppState {
        coordinator,
        config,
    };

    // No token required: health probes, onboarding, and the payment
    // collaborator (an expired user cannot log in to pay).
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/auth/register", post(auth_handlers::register))
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/subscription/pay", post(auth_handlers::pay_subscription))
        .route("/api/payments/webhook", post(policy::payment_webhook));

    let member_routes = Router::new()
        .route("/", get(party::list_members))
        .route("/", post(party::create_member))
        .route("/:id", put(party::update_member))
        .route("/:id", delete(party::delete_member));

    let dependant_routes = Router::new()
        .route("/", get(party::list_dependants))
        .route("/", post(party::create_dependant))
        .route("/:id", put(party::update_dependant))
        .route("/:id", delete(party::delete_dependant));

    let agent_routes = Router::new()
        .route("/", get(party::list_agents))
        .route("/", post(party::create_agent))
        .route("/:id", delete(party::delete_agent));

    let policy_routes = Router::new()
        .route("/", get(policy::list_policies))
        .route("/", post(policy::create_policy))
        .route("/:id", get(policy::get_policy))
        .route("/:id", put(policy::update_policy))
        .route("/:id", delete(policy::delete_policy))
        .route("/:id/arrears", get(policy::get_arrears))
        .route("/:id/reinstate", post(policy::reinstate_policy));

    let claim_routes = Router::new()
        .route("/", get(claims::list_claims))
        .route("/", post(claims::submit_claim))
        .route("/:id", get(claims::get_claim))
        .route("/:id/review", post(claims::begin_review))
        .route("/:id/approve", post(claims::approve_claim))
        .route("/:id/reject", post(claims::reject_claim))
        .route("/:id/disburse", post(claims::disburse_claim));

    let api_routes = Router::new()
        .nest("/members", member_routes)
        .nest("/dependants", dependant_routes)
        .nest("/agents", agent_routes)
        .nest("/policies", policy_routes)
        .nest("/claims", claim_routes)
        .route("/payments", post(policy::record_payment))
        .route("/documents/:filename", post(claims::upload_document))
        .route("/documentation/:reference", get(claims::download_document))
        .route("/lapse/run", post(operations::run_lapse_check))
        .route(
            "/notifications/reminders",
            post(operations::send_reminders),
        )
        .route("/retail/sync", post(operations::retail_sync))
        .route("/reports/:type", get(operations::get_report))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
