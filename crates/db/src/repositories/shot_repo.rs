//! Repository for the `shots` table.

use sqlx::PgPool;
use storyreel_core::status::GenerationStatus;
use storyreel_core::types::DbId;

use crate::models::shot::{Shot, UpdateShot};

/// Column list for shots queries. Shared with the storyboard commit in
/// [`crate::repositories::StoryRepo`].
pub(crate) const COLUMNS: &str = "id, story_id, sort_order, title, prompt, narration, \
    transition, status, image_url, created_at, updated_at";

/// Provides CRUD operations for shots.
pub struct ShotRepo;

impl ShotRepo {
    /// Find a shot by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shots WHERE id = $1");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all shots of a story in render order.
    pub async fn list_by_story(pool: &PgPool, story_id: DbId) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shots
             WHERE story_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(story_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the editable fields and reset the shot to `pending`.
    ///
    /// Returns `None` if the shot does not exist or an image job currently
    /// owns it (`status = 'generating'`).
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShot,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET
                prompt = $1,
                narration = $2,
                transition = $3,
                status = $4
             WHERE id = $5 AND status <> $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(&input.prompt)
            .bind(&input.narration)
            .bind(&input.transition)
            .bind(GenerationStatus::Pending.as_str())
            .bind(id)
            .bind(GenerationStatus::Generating.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a shot to `generating` unless it already is, in one statement.
    ///
    /// Returns `None` if the shot does not exist or is already generating.
    pub async fn claim_for_generation(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!(
            "UPDATE shots SET status = $1
             WHERE id = $2 AND status <> $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(GenerationStatus::Generating.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a shot's status. Returns `true` if a row was updated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: GenerationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE shots SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a generated image and mark the shot `completed` in one update.
    pub async fn complete_image(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE shots SET image_url = $1, status = $2 WHERE id = $3")
            .bind(image_url)
            .bind(GenerationStatus::Completed.as_str())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
