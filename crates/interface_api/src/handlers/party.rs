//! Member, dependant and agent handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::party::*;
use crate::error::{validation_error, ApiError};
use crate::AppState;

pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.coordinator.list_members().await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<MemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let member = state.coordinator.create_member(request.into()).await?;
    Ok(Json(member.into()))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let member = state
        .coordinator
        .update_member(id.into(), request.into())
        .await?;
    Ok(Json(member.into()))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.coordinator.delete_member(id.into()).await?;
    Ok(Json(serde_json::json!({ "message": "Member deleted" })))
}

pub async fn list_dependants(
    State(state): State<AppState>,
) -> Result<Json<Vec<DependantResponse>>, ApiError> {
    let dependants = state.coordinator.list_dependants().await?;
    Ok(Json(dependants.into_iter().map(Into::into).collect()))
}

pub async fn create_dependant(
    State(state): State<AppState>,
    Json(request): Json<DependantRequest>,
) -> Result<Json<DependantResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let dependant = state.coordinator.create_dependant(request.into()).await?;
    Ok(Json(dependant.into()))
}

pub async fn update_dependant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DependantRequest>,
) -> Result<Json<DependantResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let dependant = state
        .coordinator
        .update_dependant(id.into(), request.into())
        .await?;
    Ok(Json(dependant.into()))
}

pub async fn delete_dependant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.coordinator.delete_dependant(id.into()).await?;
    Ok(Json(serde_json::json!({ "message": "Dependant deleted" })))
}

pub async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentResponse>>, ApiError> {
    let agents = state.coordinator.list_agents().await?;
    Ok(Json(agents.into_iter().map(Into::into).collect()))
}

pub async fn create_agent(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    request.validate().map_err(validation_error)?;
    let agent = state.coordinator.create_agent(request.into()).await?;
    Ok(Json(agent.into()))
}

pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.coordinator.delete_agent(id.into()).await?;
    Ok(Json(serde_json::json!({ "message": "Agent deleted" })))
}
