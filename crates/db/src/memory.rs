//! In-process [`RecordStore`] implementation.
//!
//! Mirrors the Postgres schema rules that the pipeline relies on: the
//! storyboard commit is all-or-nothing, `(story_id, sort_order)` is unique,
//! and there is at most one asset per story. Used by the pipeline and API
//! test suites, and by local runs without a database.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use storyreel_core::status::GenerationStatus;
use storyreel_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::asset::{Asset, UpsertAsset};
use crate::models::shot::{CreateShot, Shot, UpdateShot};
use crate::models::story::{CreateStory, Story};
use crate::store::{RecordStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    stories: BTreeMap<DbId, Story>,
    shots: BTreeMap<DbId, Shot>,
    assets: BTreeMap<DbId, Asset>,
    next_story_id: DbId,
    next_shot_id: DbId,
    next_asset_id: DbId,
}

fn is_generating(shot: &Shot) -> bool {
    shot.status == GenerationStatus::Generating.as_str()
}

fn next_id(counter: &mut DbId) -> DbId {
    *counter += 1;
    *counter
}

/// A [`RecordStore`] holding all rows in memory behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_storyboard_commits: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent storyboard commit abort after staging its
    /// rows, as a failed transaction would.
    pub fn set_fail_storyboard_commits(&self, fail: bool) {
        self.fail_storyboard_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of asset rows for a story.
    pub async fn asset_count_for_story(&self, story_id: DbId) -> usize {
        let tables = self.tables.read().await;
        tables
            .assets
            .values()
            .filter(|a| a.story_id == story_id)
            .count()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_story(&self, input: &CreateStory) -> StoreResult<Story> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let story = Story {
            id: next_id(&mut tables.next_story_id),
            title: String::new(),
            content: input.content.clone(),
            style: input.style.clone(),
            status: GenerationStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.stories.insert(story.id, story.clone());
        Ok(story)
    }

    async fn find_story(&self, id: DbId) -> StoreResult<Option<Story>> {
        Ok(self.tables.read().await.stories.get(&id).cloned())
    }

    async fn set_story_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.stories.get_mut(&id) {
            Some(story) => {
                story.status = status.as_str().to_string();
                story.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit_storyboard(
        &self,
        story_id: DbId,
        title: &str,
        shots: &[CreateShot],
    ) -> StoreResult<Vec<Shot>> {
        let mut tables = self.tables.write().await;
        if !tables.stories.contains_key(&story_id) {
            return Err(StoreError::Unavailable(format!(
                "story {story_id} does not exist"
            )));
        }

        let mut orders: HashSet<i32> = tables
            .shots
            .values()
            .filter(|s| s.story_id == story_id)
            .map(|s| s.sort_order)
            .collect();

        // Stage every row first; nothing is applied until all pass.
        let now = Utc::now();
        let mut next_shot_id = tables.next_shot_id;
        let mut staged = Vec::with_capacity(shots.len());
        for input in shots {
            if !orders.insert(input.sort_order) {
                return Err(StoreError::Unavailable(format!(
                    "duplicate sort_order {} for story {story_id}",
                    input.sort_order
                )));
            }
            staged.push(Shot {
                id: next_id(&mut next_shot_id),
                story_id,
                sort_order: input.sort_order,
                title: input.title.clone(),
                prompt: input.prompt.clone(),
                narration: input.narration.clone(),
                transition: input.transition.clone(),
                status: input.status.clone(),
                image_url: None,
                created_at: now,
                updated_at: now,
            });
        }

        if self.fail_storyboard_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "storyboard transaction aborted".to_string(),
            ));
        }

        tables.next_shot_id = next_shot_id;
        for shot in &staged {
            tables.shots.insert(shot.id, shot.clone());
        }
        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.title = title.to_string();
            story.status = GenerationStatus::Completed.as_str().to_string();
            story.updated_at = now;
        }
        Ok(staged)
    }

    async fn list_shots(&self, story_id: DbId) -> StoreResult<Vec<Shot>> {
        let tables = self.tables.read().await;
        let mut shots: Vec<Shot> = tables
            .shots
            .values()
            .filter(|s| s.story_id == story_id)
            .cloned()
            .collect();
        shots.sort_by_key(|s| (s.sort_order, s.id));
        Ok(shots)
    }

    async fn find_shot(&self, id: DbId) -> StoreResult<Option<Shot>> {
        Ok(self.tables.read().await.shots.get(&id).cloned())
    }

    async fn update_shot(&self, id: DbId, input: &UpdateShot) -> StoreResult<Option<Shot>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .shots
            .get_mut(&id)
            .filter(|shot| !is_generating(shot))
            .map(|shot| {
                shot.prompt = input.prompt.clone();
                shot.narration = input.narration.clone();
                shot.transition = input.transition.clone();
                shot.status = GenerationStatus::Pending.as_str().to_string();
                shot.updated_at = Utc::now();
                shot.clone()
            }))
    }

    async fn claim_shot(&self, id: DbId) -> StoreResult<Option<Shot>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .shots
            .get_mut(&id)
            .filter(|shot| !is_generating(shot))
            .map(|shot| {
                shot.status = GenerationStatus::Generating.as_str().to_string();
                shot.updated_at = Utc::now();
                shot.clone()
            }))
    }

    async fn set_shot_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.shots.get_mut(&id) {
            Some(shot) => {
                shot.status = status.as_str().to_string();
                shot.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn complete_shot_image(&self, id: DbId, image_url: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.shots.get_mut(&id) {
            Some(shot) => {
                shot.image_url = Some(image_url.to_string());
                shot.status = GenerationStatus::Completed.as_str().to_string();
                shot.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert_asset(&self, input: &UpsertAsset) -> StoreResult<Asset> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let generating = GenerationStatus::Generating.as_str().to_string();

        if let Some(asset) = tables
            .assets
            .values_mut()
            .find(|a| a.story_id == input.story_id)
        {
            asset.title = input.title.clone();
            asset.thumbnail_url = input.thumbnail_url.clone();
            asset.status = generating;
            asset.video_url = None;
            asset.duration_secs = None;
            asset.duration_raw = None;
            asset.updated_at = now;
            return Ok(asset.clone());
        }

        let asset = Asset {
            id: next_id(&mut tables.next_asset_id),
            story_id: input.story_id,
            title: input.title.clone(),
            video_url: None,
            thumbnail_url: input.thumbnail_url.clone(),
            duration_secs: None,
            duration_raw: None,
            status: generating,
            created_at: now,
            updated_at: now,
        };
        tables.assets.insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn complete_asset(
        &self,
        id: DbId,
        video_url: &str,
        duration_secs: Option<f64>,
        duration_raw: Option<&str>,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.assets.get_mut(&id) {
            Some(asset) => {
                asset.video_url = Some(video_url.to_string());
                asset.duration_secs = duration_secs;
                asset.duration_raw = duration_raw.map(str::to_string);
                asset.status = GenerationStatus::Completed.as_str().to_string();
                asset.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_asset_status(&self, id: DbId, status: GenerationStatus) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.assets.get_mut(&id) {
            Some(asset) => {
                asset.status = status.as_str().to_string();
                asset.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_asset_by_story(&self, story_id: DbId) -> StoreResult<Option<Asset>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assets
            .values()
            .find(|a| a.story_id == story_id)
            .cloned())
    }

    async fn list_assets(&self) -> StoreResult<Vec<Asset>> {
        let tables = self.tables.read().await;
        let mut assets: Vec<Asset> = tables.assets.values().cloned().collect();
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(assets)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
