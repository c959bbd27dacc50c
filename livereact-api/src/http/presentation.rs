//! Presentation record endpoints
//!
//! The durable side of reactions: creating presentations, reading them with
//! their counters, and the direct counter-increment endpoint. Fan-out to live
//! viewers is owned by the WebSocket path, not these handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use livereact_core::models::{Presentation, PresentationId, ReactionKind};

use crate::http::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreatePresentationRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AddReactionRequest {
    pub reaction_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddReactionResponse {
    pub id: PresentationId,
    pub reaction_type: ReactionKind,
}

/// POST /api/presentations
pub async fn create_presentation(
    State(state): State<AppState>,
    Json(request): Json<CreatePresentationRequest>,
) -> AppResult<Json<Presentation>> {
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Title is required"))?;

    let presentation = state.store.create(title, request.description).await?;

    info!(
        presentation_id = %presentation.id.as_str(),
        title = %presentation.title,
        "Presentation created"
    );

    Ok(Json(presentation))
}

/// GET /api/presentations/{presentation_id}
pub async fn get_presentation(
    State(state): State<AppState>,
    Path(presentation_id): Path<String>,
) -> AppResult<Json<Presentation>> {
    let id = PresentationId::from_string(presentation_id);
    let presentation = state.store.get(&id).await?;
    Ok(Json(presentation))
}

/// POST /api/presentations/{presentation_id}/reactions
///
/// Durable increment only; live viewers get reactions over the WebSocket
/// channel instead.
pub async fn add_reaction(
    State(state): State<AppState>,
    Path(presentation_id): Path<String>,
    Json(request): Json<AddReactionRequest>,
) -> AppResult<Json<AddReactionResponse>> {
    let raw_kind = request
        .reaction_type
        .ok_or_else(|| AppError::bad_request("reaction_type is required"))?;

    let kind: ReactionKind = raw_kind.parse()?;

    let id = PresentationId::from_string(presentation_id);
    state.store.increment(&id, kind).await?;

    Ok(Json(AddReactionResponse {
        id,
        reaction_type: kind,
    }))
}
