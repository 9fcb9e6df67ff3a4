//! Composed video asset models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use storyreel_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `assets` table. At most one per story.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub story_id: DbId,
    pub title: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<f64>,
    /// Duration string as reported by the video service.
    pub duration_raw: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Upsert DTO
// ---------------------------------------------------------------------------

/// Input for starting (or restarting) video composition for a story.
///
/// The stored row is reset to `generating` with no video URL or duration.
#[derive(Debug, Clone)]
pub struct UpsertAsset {
    pub story_id: DbId,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// Returned when video composition is triggered.
#[derive(Debug, Clone, Serialize)]
pub struct VideoTriggerResponse {
    pub asset_id: DbId,
    pub status: String,
}

/// Video polling snapshot for a story.
#[derive(Debug, Clone, Serialize)]
pub struct StoryPreviewResponse {
    pub status: String,
    pub preview_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration_secs: Option<f64>,
    pub duration_raw: Option<String>,
    pub error: Option<String>,
}
