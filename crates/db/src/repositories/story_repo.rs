//! Repository for the `stories` table.

use sqlx::PgPool;
use storyreel_core::status::GenerationStatus;
use storyreel_core::types::DbId;

use crate::models::shot::{CreateShot, Shot};
use crate::models::story::{CreateStory, Story};
use crate::repositories::shot_repo;

/// Column list for stories queries.
const COLUMNS: &str = "id, title, content, style, status, created_at, updated_at";

/// Provides CRUD operations for stories.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a new story in the `pending` state, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStory) -> Result<Story, sqlx::Error> {
        let query = format!(
            "INSERT INTO stories (content, style, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(&input.content)
            .bind(&input.style)
            .bind(GenerationStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a story by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set a story's status. Returns `true` if a row was updated.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: GenerationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE stories SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist a storyboard in one transaction: insert every shot, then set
    /// the story's title and mark it `completed`.
    ///
    /// Either all rows land or none do. A missing story aborts the
    /// transaction with [`sqlx::Error::RowNotFound`].
    pub async fn commit_storyboard(
        pool: &PgPool,
        story_id: DbId,
        title: &str,
        shots: &[CreateShot],
    ) -> Result<Vec<Shot>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(shots.len());

        let insert = format!(
            "INSERT INTO shots
                (story_id, sort_order, title, prompt, narration, transition, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            shot_repo::COLUMNS
        );

        for shot in shots {
            let row = sqlx::query_as::<_, Shot>(&insert)
                .bind(story_id)
                .bind(shot.sort_order)
                .bind(&shot.title)
                .bind(&shot.prompt)
                .bind(&shot.narration)
                .bind(&shot.transition)
                .bind(&shot.status)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        let result = sqlx::query("UPDATE stories SET title = $1, status = $2 WHERE id = $3")
            .bind(title)
            .bind(GenerationStatus::Completed.as_str())
            .bind(story_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            // Dropping `tx` rolls back the shot inserts.
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;
        Ok(created)
    }
}
