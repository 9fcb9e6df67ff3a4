//! Story models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyreel_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `stories` table.
///
/// `title` stays empty until the storyboard stage derives one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub style: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a new story. The row always starts as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStory {
    pub content: String,
    pub style: String,
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// Status snapshot returned on submission and by the polling endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StoryStatusResponse {
    pub story_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}

impl From<&Story> for StoryStatusResponse {
    fn from(story: &Story) -> Self {
        Self {
            story_id: story.id,
            status: story.status.clone(),
            created_at: story.created_at,
        }
    }
}
