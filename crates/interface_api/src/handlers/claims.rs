//! Claims handlers
//!
//! Documents are uploaded first and referenced by the claim submission,
//! so the state machine never sees multipart mechanics.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::claims::*;
use crate::dto::policy::money_field;
use crate::error::{validation_error, ApiError};
use crate::AppState;

/// Uploads a supporting document, returning an opaque reference
pub async fn upload_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    body: Bytes,
) -> Result<Json<DocumentUploadResponse>, ApiError> {
    if body.is_empty() {
        return Err(core_kernel::CoreError::invalid_argument("document body is empty").into());
    }
    let reference = state
        .coordinator
        .store_document(&filename, body.to_vec())
        .await?;
    Ok(Json(DocumentUploadResponse { reference }))
}

/// Downloads a stored document
pub async fn download_document(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.coordinator.fetch_document(&reference).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{reference}\""),
            ),
        ],
        bytes,
    ))
}

pub async fn submit_claim(
    State(state): State<AppState>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let claim = state.coordinator.submit_claim(request.into()).await?;
    Ok(Json(claim.into()))
}

pub async fn list_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.coordinator.list_claims().await?;
    Ok(Json(claims.into_iter().map(Into::into).collect()))
}

pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.coordinator.get_claim(id.into()).await?;
    Ok(Json(claim.into()))
}

pub async fn begin_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.coordinator.begin_claim_review(id.into()).await?;
    Ok(Json(claim.into()))
}

pub async fn approve_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.coordinator.approve_claim(id.into()).await?;
    Ok(Json(claim.into()))
}

pub async fn reject_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let claim = state
        .coordinator
        .reject_claim(id.into(), &request.reason)
        .await?;
    Ok(Json(claim.into()))
}

pub async fn disburse_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DisburseClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let payout = money_field(request.payout, "payout")?;
    let claim = state.coordinator.disburse_claim(id.into(), payout).await?;
    Ok(Json(claim.into()))
}
