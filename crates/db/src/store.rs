//! The record store interface consumed by the generation pipeline.
//!
//! Every write is keyed by a single row id (a story, a shot, or the asset
//! of a story), so concurrent pipeline jobs never touch the same row and
//! the store's per-row update semantics are the only synchronisation point.

use async_trait::async_trait;
use storyreel_core::status::GenerationStatus;
use storyreel_core::types::DbId;

use crate::models::asset::{Asset, UpsertAsset};
use crate::models::shot::{CreateShot, Shot, UpdateShot};
use crate::models::story::{CreateStory, Story};
use crate::repositories::{AssetRepo, ShotRepo, StoryRepo};
use crate::DbPool;

/// Errors raised by a [`RecordStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not complete the write (used by non-SQL stores).
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias for store return values.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for stories, shots and assets.
///
/// Update methods return `true` when the target row existed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new story in the `pending` state.
    async fn create_story(&self, input: &CreateStory) -> StoreResult<Story>;

    async fn find_story(&self, id: DbId) -> StoreResult<Option<Story>>;

    async fn set_story_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool>;

    /// Atomically insert the storyboard's shots and mark the story
    /// `completed` with the derived title. On error nothing is written.
    async fn commit_storyboard(
        &self,
        story_id: DbId,
        title: &str,
        shots: &[CreateShot],
    ) -> StoreResult<Vec<Shot>>;

    /// All shots of a story ordered by `sort_order` ascending.
    async fn list_shots(&self, story_id: DbId) -> StoreResult<Vec<Shot>>;

    async fn find_shot(&self, id: DbId) -> StoreResult<Option<Shot>>;

    /// Overwrite prompt, narration and transition and reset to `pending`.
    ///
    /// `None` when the shot is missing or `generating`; the check and the
    /// write are one atomic step.
    async fn update_shot(&self, id: DbId, input: &UpdateShot) -> StoreResult<Option<Shot>>;

    /// Atomically move a shot to `generating` unless it already is.
    ///
    /// `None` when the shot is missing or already `generating`. The caller
    /// that gets `Some` is the shot's only image writer until it finishes.
    async fn claim_shot(&self, id: DbId) -> StoreResult<Option<Shot>>;

    async fn set_shot_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool>;

    /// Set the image URL and `completed` status in a single write.
    async fn complete_shot_image(&self, id: DbId, image_url: &str) -> StoreResult<bool>;

    /// Insert or reset the story's single asset to `generating`.
    async fn upsert_asset(&self, input: &UpsertAsset) -> StoreResult<Asset>;

    /// Set video URL, duration and `completed` status in a single write.
    ///
    /// `duration_raw` is the service's string, stored alongside the parsed
    /// seconds so an unparseable value is not lost.
    async fn complete_asset(
        &self,
        id: DbId,
        video_url: &str,
        duration_secs: Option<f64>,
        duration_raw: Option<&str>,
    ) -> StoreResult<bool>;

    async fn set_asset_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool>;

    async fn find_asset_by_story(&self, story_id: DbId) -> StoreResult<Option<Asset>>;

    /// All assets, newest first.
    async fn list_assets(&self) -> StoreResult<Vec<Asset>>;

    /// Confirm the backing store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// [`RecordStore`] backed by the Postgres repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn create_story(&self, input: &CreateStory) -> StoreResult<Story> {
        Ok(StoryRepo::create(&self.pool, input).await?)
    }

    async fn find_story(&self, id: DbId) -> StoreResult<Option<Story>> {
        Ok(StoryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn set_story_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool> {
        Ok(StoryRepo::update_status(&self.pool, id, status).await?)
    }

    async fn commit_storyboard(
        &self,
        story_id: DbId,
        title: &str,
        shots: &[CreateShot],
    ) -> StoreResult<Vec<Shot>> {
        Ok(StoryRepo::commit_storyboard(&self.pool, story_id, title, shots).await?)
    }

    async fn list_shots(&self, story_id: DbId) -> StoreResult<Vec<Shot>> {
        Ok(ShotRepo::list_by_story(&self.pool, story_id).await?)
    }

    async fn find_shot(&self, id: DbId) -> StoreResult<Option<Shot>> {
        Ok(ShotRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_shot(&self, id: DbId, input: &UpdateShot) -> StoreResult<Option<Shot>> {
        Ok(ShotRepo::update_content(&self.pool, id, input).await?)
    }

    async fn claim_shot(&self, id: DbId) -> StoreResult<Option<Shot>> {
        Ok(ShotRepo::claim_for_generation(&self.pool, id).await?)
    }

    async fn set_shot_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool> {
        Ok(ShotRepo::update_status(&self.pool, id, status).await?)
    }

    async fn complete_shot_image(&self, id: DbId, image_url: &str) -> StoreResult<bool> {
        Ok(ShotRepo::complete_image(&self.pool, id, image_url).await?)
    }

    async fn upsert_asset(&self, input: &UpsertAsset) -> StoreResult<Asset> {
        Ok(AssetRepo::upsert_generating(&self.pool, input).await?)
    }

    async fn complete_asset(
        &self,
        id: DbId,
        video_url: &str,
        duration_secs: Option<f64>,
        duration_raw: Option<&str>,
    ) -> StoreResult<bool> {
        Ok(AssetRepo::complete(&self.pool, id, video_url, duration_secs, duration_raw).await?)
    }

    async fn set_asset_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool> {
        Ok(AssetRepo::update_status(&self.pool, id, status).await?)
    }

    async fn find_asset_by_story(&self, story_id: DbId) -> StoreResult<Option<Asset>> {
        Ok(AssetRepo::find_by_story(&self.pool, story_id).await?)
    }

    async fn list_assets(&self) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list(&self.pool).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
