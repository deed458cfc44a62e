//! Project routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::error::ApiError;
use super::AppState;
use crate::models::{Project, ProjectDraft};

const ENTITY: &str = "project";
const ENTITY_LABEL: &str = "Project";

/// Parse a path segment as a positive integer id, before any storage call.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::InvalidId(ENTITY))
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.storage.list_projects().await?))
}

/// GET /api/projects/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&raw_id)?;
    let project = state
        .storage
        .get_project(id)
        .await?
        .ok_or(ApiError::NotFound(ENTITY_LABEL))?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ProjectDraft>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let new_project = draft
        .into_new()
        .map_err(|e| ApiError::validation(ENTITY, e))?;
    let project = state.storage.create_project(new_project).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PATCH /api/projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&raw_id)?;
    let patch = draft
        .into_patch()
        .map_err(|e| ApiError::validation(ENTITY, e))?;
    let project = state
        .storage
        .update_project(id, patch)
        .await?
        .ok_or(ApiError::NotFound(ENTITY_LABEL))?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    if state.storage.delete_project(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(ENTITY_LABEL))
    }
}
