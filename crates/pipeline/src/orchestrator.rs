//! Orchestrator construction, read operations and shot editing.
//!
//! Stage entry points live in [`crate::storyboard`], [`crate::image`] and
//! [`crate::video`] as further `impl Orchestrator` blocks.

use std::sync::Arc;
use std::time::Duration;

use storyreel_core::error::CoreError;
use storyreel_core::status::GenerationStatus;
use storyreel_core::story::{shot_write_rejection, validate_story_content, VIDEO_GENERATION_FAILED};
use storyreel_core::types::DbId;
use storyreel_db::models::asset::{Asset, StoryPreviewResponse};
use storyreel_db::models::shot::{Shot, StoryShotsResponse, UpdateShot};
use storyreel_db::models::story::{CreateStory, Story, StoryStatusResponse};
use storyreel_db::store::RecordStore;
use storyreel_generation::GenerationServices;
use tokio_util::task::TaskTracker;

use crate::error::{PipelineError, PipelineResult};

/// Drives stories through storyboard, image and video generation.
///
/// Cheap to clone: the store handle, service clients and task tracker are
/// shared. Background jobs are spawned on the internal [`TaskTracker`];
/// callers never hold their handles.
#[derive(Clone)]
pub struct Orchestrator {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) services: GenerationServices,
    pub(crate) tasks: TaskTracker,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn RecordStore>, services: GenerationServices) -> Self {
        Self {
            store,
            services,
            tasks: TaskTracker::new(),
        }
    }

    /// The record store this orchestrator writes to.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Number of background generation tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every background task, including tasks spawned by other
    /// tasks while waiting, has finished. New work may be launched again
    /// afterwards.
    pub async fn wait_idle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Wait up to `timeout` for in-flight tasks during process shutdown.
    ///
    /// Returns `false` if tasks were still running when the timeout elapsed.
    /// Tasks are never cancelled.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tasks.close();
        tokio::time::timeout(timeout, self.tasks.wait()).await.is_ok()
    }

    // -----------------------------------------------------------------------
    // Stories
    // -----------------------------------------------------------------------

    /// Persist a new story and launch its storyboard stage.
    ///
    /// Returns as soon as the `pending` row exists.
    pub async fn submit_story(
        &self,
        content: &str,
        style: &str,
    ) -> PipelineResult<StoryStatusResponse> {
        validate_story_content(content)?;

        let input = CreateStory {
            content: content.to_string(),
            style: style.trim().to_string(),
        };
        let story = self.store.create_story(&input).await?;

        tracing::info!(story_id = story.id, style = %story.style, "Story submitted");

        self.launch_storyboard(story.id, story.content.clone());
        Ok(StoryStatusResponse::from(&story))
    }

    pub async fn get_story(&self, id: DbId) -> PipelineResult<Story> {
        let story = self
            .store
            .find_story(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Story", id })?;
        Ok(story)
    }

    /// Status snapshot for polling.
    pub async fn story_status(&self, id: DbId) -> PipelineResult<StoryStatusResponse> {
        let story = self.get_story(id).await?;
        Ok(StoryStatusResponse::from(&story))
    }

    /// Composition progress for a story's video.
    ///
    /// A story without an asset reports `pending`.
    pub async fn story_preview(&self, story_id: DbId) -> PipelineResult<StoryPreviewResponse> {
        self.get_story(story_id).await?;

        let preview = match self.store.find_asset_by_story(story_id).await? {
            Some(asset) => {
                let failed = asset.status == GenerationStatus::Failed.as_str();
                StoryPreviewResponse {
                    status: asset.status,
                    preview_url: asset.video_url,
                    cover_url: asset.thumbnail_url,
                    duration_secs: asset.duration_secs,
                    duration_raw: asset.duration_raw,
                    error: failed.then(|| VIDEO_GENERATION_FAILED.to_string()),
                }
            }
            None => StoryPreviewResponse {
                status: GenerationStatus::Pending.as_str().to_string(),
                preview_url: None,
                cover_url: None,
                duration_secs: None,
                duration_raw: None,
                error: None,
            },
        };
        Ok(preview)
    }

    /// Every composed asset, newest first.
    pub async fn list_assets(&self) -> PipelineResult<Vec<Asset>> {
        let assets = self.store.list_assets().await?;
        tracing::debug!(count = assets.len(), "Listed assets");
        Ok(assets)
    }

    // -----------------------------------------------------------------------
    // Shots
    // -----------------------------------------------------------------------

    /// Shots of a story in render order.
    pub async fn list_shots(&self, story_id: DbId) -> PipelineResult<StoryShotsResponse> {
        self.get_story(story_id).await?;
        let shots = self.store.list_shots(story_id).await?;
        tracing::debug!(story_id, count = shots.len(), "Listed story shots");
        Ok(StoryShotsResponse { story_id, shots })
    }

    pub async fn get_shot(&self, id: DbId) -> PipelineResult<Shot> {
        let shot = self
            .store
            .find_shot(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Shot", id })?;
        Ok(shot)
    }

    /// Overwrite a shot's prompt, narration and transition and reset it to
    /// `pending` so it is eligible for regeneration.
    ///
    /// Rejected with `PreconditionFailed` while an image job owns the shot.
    pub async fn update_shot(&self, id: DbId, input: &UpdateShot) -> PipelineResult<Shot> {
        let Some(shot) = self.store.update_shot(id, input).await? else {
            return Err(self.shot_write_rejected(id).await);
        };

        tracing::info!(shot_id = id, story_id = shot.story_id, "Shot updated");
        Ok(shot)
    }

    /// Classify a guarded shot write that matched no row.
    pub(crate) async fn shot_write_rejected(&self, id: DbId) -> PipelineError {
        match self.store.find_shot(id).await {
            Ok(shot) => {
                let err = shot_write_rejection(id, shot.as_ref().map(|s| s.status.as_str()));
                tracing::debug!(shot_id = id, error = %err, "Shot write rejected");
                err.into()
            }
            Err(e) => e.into(),
        }
    }
}
