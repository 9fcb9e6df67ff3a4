//! Video stage: every shot of a story composed into one asset.

use storyreel_core::error::CoreError;
use storyreel_core::status::GenerationStatus;
use storyreel_core::story::{ensure_storyboard_ready, non_empty_url, parse_duration_secs};
use storyreel_core::types::DbId;
use storyreel_db::models::asset::{UpsertAsset, VideoTriggerResponse};
use storyreel_db::models::shot::Shot;
use storyreel_generation::messages::{VideoRequest, VideoShot};

use crate::error::PipelineResult;
use crate::orchestrator::Orchestrator;

/// Build the composition request from shots already in render order.
///
/// Shots without an image are sent with an empty `image_url`; the video
/// service decides what to do with them.
pub fn build_video_request(story_id: DbId, shots: &[Shot]) -> VideoRequest {
    VideoRequest {
        story_id: story_id.to_string(),
        shots: shots
            .iter()
            .map(|shot| VideoShot {
                image_url: shot.image_url.clone().unwrap_or_default(),
                narration: shot.narration.clone(),
                transition: shot.transition.clone(),
            })
            .collect(),
    }
}

impl Orchestrator {
    /// Start composing a story's video.
    ///
    /// Fails with `PreconditionFailed` while the story has no shots. Resets
    /// the story's single asset to `generating` (creating it if needed) and
    /// returns; composition runs in the background.
    pub async fn trigger_video(&self, story_id: DbId) -> PipelineResult<VideoTriggerResponse> {
        let story = self.get_story(story_id).await?;
        let shots = self.store.list_shots(story_id).await?;
        ensure_storyboard_ready(shots.len())?;

        let thumbnail_url = shots
            .first()
            .and_then(|shot| shot.image_url.as_deref())
            .and_then(non_empty_url)
            .map(str::to_string);

        let asset = self
            .store
            .upsert_asset(&UpsertAsset {
                story_id,
                title: story.title.clone(),
                thumbnail_url,
            })
            .await?;

        tracing::info!(
            story_id,
            asset_id = asset.id,
            shot_count = shots.len(),
            "Video composition requested",
        );

        let request = build_video_request(story_id, &shots);
        self.launch_video(asset.id, request);

        Ok(VideoTriggerResponse {
            asset_id: asset.id,
            status: asset.status,
        })
    }

    fn launch_video(&self, asset_id: DbId, request: VideoRequest) {
        let this = self.clone();
        self.tasks.spawn(async move {
            this.run_video_stage(asset_id, request).await;
        });
    }

    async fn run_video_stage(&self, asset_id: DbId, request: VideoRequest) {
        let response = match self.services.video.generate_video(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    asset_id,
                    story_id = %request.story_id,
                    transport = e.is_transport(),
                    error = %e,
                    "Video generation failed",
                );
                self.fail_asset(asset_id).await;
                return;
            }
        };

        let Some(video_url) = non_empty_url(&response.video_url) else {
            tracing::warn!(asset_id, "Video service returned an empty URL");
            self.fail_asset(asset_id).await;
            return;
        };

        let duration_raw = Some(response.duration.trim()).filter(|d| !d.is_empty());
        let duration_secs = parse_duration_secs(&response.duration);
        if duration_secs.is_none() {
            if let Some(raw) = duration_raw {
                tracing::warn!(asset_id, duration = raw, "Unparseable video duration, keeping raw value");
            }
        }

        match self
            .store
            .complete_asset(asset_id, video_url, duration_secs, duration_raw)
            .await
        {
            Ok(true) => tracing::info!(asset_id, video_url, ?duration_secs, "Video completed"),
            Ok(false) => tracing::warn!(asset_id, "Asset disappeared before video was recorded"),
            Err(e) => {
                tracing::error!(asset_id, error = %e, "Failed to record video");
                self.fail_asset(asset_id).await;
            }
        }
    }

    async fn fail_asset(&self, asset_id: DbId) {
        if let Err(e) = self
            .store
            .set_asset_status(asset_id, GenerationStatus::Failed)
            .await
        {
            tracing::error!(asset_id, error = %e, "Failed to mark asset failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn shot(id: DbId, sort_order: i32, image_url: Option<&str>) -> Shot {
        let now = Utc::now();
        Shot {
            id,
            story_id: 1,
            sort_order,
            title: format!("Shot {sort_order}"),
            prompt: "prompt".to_string(),
            narration: format!("narration {sort_order}"),
            transition: format!("transition {sort_order}"),
            status: "completed".to_string(),
            image_url: image_url.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn request_preserves_shot_order() {
        let shots = vec![shot(10, 1, Some("a.png")), shot(11, 2, Some("b.png"))];
        let request = build_video_request(42, &shots);
        assert_eq!(request.story_id, "42");
        let urls: Vec<&str> = request.shots.iter().map(|s| s.image_url.as_str()).collect();
        assert_eq!(urls, vec!["a.png", "b.png"]);
        assert_eq!(request.shots[1].narration, "narration 2");
        assert_eq!(request.shots[1].transition, "transition 2");
    }

    #[test]
    fn missing_image_is_sent_empty() {
        let request = build_video_request(1, &[shot(10, 1, None)]);
        assert_eq!(request.shots[0].image_url, "");
    }
}
