pub mod health;
pub mod shot;
pub mod story;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /story                          submit (POST)
/// /story/all                      composed videos, newest first
/// /story/{id}                     story record
/// /story/{id}/status              status snapshot
/// /story/{id}/shots               shots in render order
/// /story/{id}/generate-video      start composition (POST)
/// /story/{id}/preview             composition progress
///
/// /shot/{id}                      shot record
/// /shot/{id}/preview              image status
/// /shot/{id}/update               edit content (POST)
/// /shot/{id}/regenerate           re-render image (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/story", story::router())
        .nest("/shot", shot::router())
}
