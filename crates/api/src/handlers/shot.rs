//! Handlers for shot inspection, editing and image regeneration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use storyreel_core::types::DbId;
use storyreel_db::models::shot::UpdateShot;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/shot/{id}
pub async fn get_shot(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let shot = state.orchestrator.get_shot(id).await?;
    Ok(Json(DataResponse { data: shot }))
}

/// GET /api/shot/{id}/preview
pub async fn shot_preview(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let status = state.orchestrator.shot_status(id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /api/shot/{id}/update
///
/// Overwrites prompt, narration and transition. The shot goes back to
/// `pending` until regenerated.
pub async fn update_shot(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateShot>,
) -> AppResult<impl IntoResponse> {
    let shot = state.orchestrator.update_shot(id, &input).await?;
    Ok(Json(DataResponse { data: shot }))
}

/// POST /api/shot/{id}/regenerate
pub async fn regenerate_shot(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let status = state.orchestrator.regenerate_shot(id).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: status })))
}
