//! Repository for the `assets` table.

use sqlx::PgPool;
use storyreel_core::status::GenerationStatus;
use storyreel_core::types::DbId;

use crate::models::asset::{Asset, UpsertAsset};

/// Column list for assets queries.
const COLUMNS: &str = "id, story_id, title, video_url, thumbnail_url, duration_secs, \
    duration_raw, status, created_at, updated_at";

/// Provides CRUD operations for composed video assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Start a composition cycle for a story's asset.
    ///
    /// Uses `ON CONFLICT (story_id) DO UPDATE` to guarantee one row per
    /// story: an existing row keeps its id and is reset to `generating` with
    /// the video URL and duration cleared.
    pub async fn upsert_generating(
        pool: &PgPool,
        input: &UpsertAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (story_id, title, thumbnail_url, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (story_id) DO UPDATE \
             SET title = EXCLUDED.title, \
                 thumbnail_url = EXCLUDED.thumbnail_url, \
                 status = EXCLUDED.status, \
                 video_url = NULL, \
                 duration_secs = NULL, \
                 duration_raw = NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.story_id)
            .bind(&input.title)
            .bind(&input.thumbnail_url)
            .bind(GenerationStatus::Generating.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find the asset belonging to a story.
    pub async fn find_by_story(
        pool: &PgPool,
        story_id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE story_id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(story_id)
            .fetch_optional(pool)
            .await
    }

    /// List all assets, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Asset>(&query).fetch_all(pool).await
    }

    /// Persist the composed video and mark the asset `completed`.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        video_url: &str,
        duration_secs: Option<f64>,
        duration_raw: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assets SET video_url = $1, duration_secs = $2, duration_raw = $3, status = $4 \
             WHERE id = $5",
        )
        .bind(video_url)
        .bind(duration_secs)
        .bind(duration_raw)
        .bind(GenerationStatus::Completed.as_str())
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set an asset's status. Returns `true` if a row was updated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: GenerationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE assets SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
