use axum::routing::{get, post};
use axum::Router;

use crate::handlers::story;
use crate::state::AppState;

/// Story routes mounted at `/story`.
///
/// ```text
/// POST   /                     -> submit_story
/// GET    /all                  -> list_assets
/// GET    /{id}                 -> get_story
/// GET    /{id}/status          -> story_status
/// GET    /{id}/shots           -> list_shots
/// POST   /{id}/generate-video  -> generate_video
/// GET    /{id}/preview         -> story_preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(story::submit_story))
        .route("/all", get(story::list_assets))
        .route("/{id}", get(story::get_story))
        .route("/{id}/status", get(story::story_status))
        .route("/{id}/shots", get(story::list_shots))
        .route("/{id}/generate-video", post(story::generate_video))
        .route("/{id}/preview", get(story::story_preview))
}
