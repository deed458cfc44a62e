//! Contact routes.
//!
//! The public surface is write-only; the list is an administrative read.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::models::{Contact, ContactDraft};

const ENTITY: &str = "contact";

/// POST /api/contact - public submission endpoint.
///
/// Responds with `{success, id}` rather than the full record; the sender
/// has no use for the stored row.
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ContactDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_contact = draft
        .into_new()
        .map_err(|e| ApiError::validation(ENTITY, e))?;
    let contact = state.storage.create_contact(new_contact).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": contact.id })),
    ))
}

/// GET /api/contact - administrative listing.
// TODO: gate behind an access-control layer before production exposure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(state.storage.list_contacts().await?))
}
