//! Shot models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `shots` table: one storyboard scene.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub story_id: DbId,
    pub sort_order: i32,
    pub title: String,
    pub prompt: String,
    pub narration: String,
    pub transition: String,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// Input for one shot of a storyboard batch.
#[derive(Debug, Clone)]
pub struct CreateShot {
    pub sort_order: i32,
    pub title: String,
    pub prompt: String,
    pub narration: String,
    pub transition: String,
    pub status: String,
}

/// Editable shot fields. All three are overwritten together.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShot {
    pub prompt: String,
    pub narration: String,
    pub transition: String,
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// Ordered shot list for a story.
#[derive(Debug, Clone, Serialize)]
pub struct StoryShotsResponse {
    pub story_id: DbId,
    pub shots: Vec<Shot>,
}

/// Image generation progress for a single shot.
#[derive(Debug, Clone, Serialize)]
pub struct ShotStatusResponse {
    pub shot_id: DbId,
    pub status: String,
    pub image_url: Option<String>,
}

impl From<&Shot> for ShotStatusResponse {
    fn from(shot: &Shot) -> Self {
        Self {
            shot_id: shot.id,
            status: shot.status.clone(),
            image_url: shot.image_url.clone(),
        }
    }
}
