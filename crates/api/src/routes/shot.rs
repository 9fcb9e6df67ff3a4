use axum::routing::{get, post};
use axum::Router;

use crate::handlers::shot;
use crate::state::AppState;

/// Shot routes mounted at `/shot`.
///
/// ```text
/// GET    /{id}             -> get_shot
/// GET    /{id}/preview     -> shot_preview
/// POST   /{id}/update      -> update_shot
/// POST   /{id}/regenerate  -> regenerate_shot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(shot::get_shot))
        .route("/{id}/preview", get(shot::shot_preview))
        .route("/{id}/update", post(shot::update_shot))
        .route("/{id}/regenerate", post(shot::regenerate_shot))
}
