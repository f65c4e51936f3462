//! Batch and integration operation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use domain_policy::LapseSummary;

use crate::coordinator::ReminderSummary;
use crate::error::ApiError;
use crate::AppState;

/// Runs the lapse check over every active policy
pub async fn run_lapse_check(
    State(state): State<AppState>,
) -> Result<Json<LapseSummary>, ApiError> {
    let summary = state.coordinator.run_lapse_check().await?;
    Ok(Json(summary))
}

/// Dispatches payment reminders to members with active policies
pub async fn send_reminders(
    State(state): State<AppState>,
) -> Result<Json<ReminderSummary>, ApiError> {
    let summary = state.coordinator.send_reminders().await?;
    Ok(Json(summary))
}

/// Requests a payment sync from the retail platform
pub async fn retail_sync(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let ingested = state.coordinator.sync_retail_payments().await?;
    Ok(Json(json!({
        "message": "Retail sync requested",
        "ingested": ingested,
    })))
}

/// Report envelope; population is a downstream concern
pub async fn get_report(Path(report_type): Path<String>) -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "report": report_type,
        "data": [],
    })))
}
