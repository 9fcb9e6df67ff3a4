//! Handlers for story submission, polling and video composition.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use storyreel_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/story`.
#[derive(Debug, Deserialize)]
pub struct SubmitStoryRequest {
    pub content: String,
    #[serde(default)]
    pub style: String,
}

/// POST /api/story
///
/// Persist the story and start storyboard generation. Responds `201` with
/// the `pending` status snapshot.
pub async fn submit_story(
    State(state): State<AppState>,
    AppJson(input): AppJson<SubmitStoryRequest>,
) -> AppResult<impl IntoResponse> {
    let status = state
        .orchestrator
        .submit_story(&input.content, &input.style)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: status })))
}

/// GET /api/story/all
pub async fn list_assets(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let assets = state.orchestrator.list_assets().await?;
    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/story/{id}
pub async fn get_story(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let story = state.orchestrator.get_story(id).await?;
    Ok(Json(DataResponse { data: story }))
}

/// GET /api/story/{id}/status
pub async fn story_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let status = state.orchestrator.story_status(id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// GET /api/story/{id}/shots
pub async fn list_shots(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let shots = state.orchestrator.list_shots(id).await?;
    Ok(Json(DataResponse { data: shots }))
}

/// POST /api/story/{id}/generate-video
///
/// Responds `202` once the asset is `generating`; `409` while the story has
/// no shots.
pub async fn generate_video(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let triggered = state.orchestrator.trigger_video(id).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: triggered })))
}

/// GET /api/story/{id}/preview
pub async fn story_preview(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let preview = state.orchestrator.story_preview(id).await?;
    Ok(Json(DataResponse { data: preview }))
}
