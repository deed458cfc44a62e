//! Testimonial routes.
//!
//! Reads are public; the write routes are administrative and share the
//! access-control gap noted on the contact listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::error::ApiError;
use super::AppState;
use crate::models::{Testimonial, TestimonialDraft};

const ENTITY: &str = "testimonial";
const ENTITY_LABEL: &str = "Testimonial";

/// Parse a path segment as a positive integer id, before any storage call.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::InvalidId(ENTITY))
}

/// GET /api/testimonials - ordered by display order ascending.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>, ApiError> {
    Ok(Json(state.storage.list_testimonials().await?))
}

/// GET /api/testimonials/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Testimonial>, ApiError> {
    let id = parse_id(&raw_id)?;
    let testimonial = state
        .storage
        .get_testimonial(id)
        .await?
        .ok_or(ApiError::NotFound(ENTITY_LABEL))?;
    Ok(Json(testimonial))
}

/// POST /api/testimonials
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TestimonialDraft>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    let new_testimonial = draft
        .into_new()
        .map_err(|e| ApiError::validation(ENTITY, e))?;
    let testimonial = state.storage.create_testimonial(new_testimonial).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PATCH /api/testimonials/:id
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(draft): Json<TestimonialDraft>,
) -> Result<Json<Testimonial>, ApiError> {
    let id = parse_id(&raw_id)?;
    let patch = draft
        .into_patch()
        .map_err(|e| ApiError::validation(ENTITY, e))?;
    let testimonial = state
        .storage
        .update_testimonial(id, patch)
        .await?
        .ok_or(ApiError::NotFound(ENTITY_LABEL))?;
    Ok(Json(testimonial))
}

/// DELETE /api/testimonials/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    if state.storage.delete_testimonial(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(ENTITY_LABEL))
    }
}
