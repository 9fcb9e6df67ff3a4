//! Image stage: one independent job per shot.

use storyreel_core::status::GenerationStatus;
use storyreel_core::story::{non_empty_url, SHOT_IMAGE_SIZE};
use storyreel_core::types::DbId;
use storyreel_db::models::shot::ShotStatusResponse;

use crate::error::PipelineResult;
use crate::orchestrator::Orchestrator;

impl Orchestrator {
    /// Status snapshot of a single shot.
    pub async fn shot_status(&self, id: DbId) -> PipelineResult<ShotStatusResponse> {
        let shot = self.get_shot(id).await?;
        Ok(ShotStatusResponse::from(&shot))
    }

    /// Re-render a shot's image from its current prompt.
    ///
    /// Claims the shot by moving it to `generating` in one conditional
    /// write, then returns; the image job runs in the background. A shot
    /// that is already generating is rejected with `PreconditionFailed`, so
    /// at most one image job writes to a shot at a time.
    pub async fn regenerate_shot(&self, id: DbId) -> PipelineResult<ShotStatusResponse> {
        let Some(shot) = self.store.claim_shot(id).await? else {
            return Err(self.shot_write_rejected(id).await);
        };

        tracing::info!(shot_id = id, story_id = shot.story_id, "Shot regeneration requested");

        let status = ShotStatusResponse::from(&shot);
        self.launch_image(shot.id, shot.prompt);
        Ok(status)
    }

    /// Run the image job for one shot in the background.
    pub(crate) fn launch_image(&self, shot_id: DbId, prompt: String) {
        let this = self.clone();
        self.tasks.spawn(async move {
            this.run_image_stage(shot_id, prompt).await;
        });
    }

    /// Render one shot and record the outcome on that shot only.
    async fn run_image_stage(&self, shot_id: DbId, prompt: String) {
        let outcome = self
            .services
            .image
            .generate_image(&prompt, SHOT_IMAGE_SIZE)
            .await;

        let url = match outcome {
            Ok(url) => match non_empty_url(&url) {
                Some(url) => url.to_string(),
                None => {
                    tracing::warn!(shot_id, "Image service returned an empty URL");
                    self.fail_shot(shot_id).await;
                    return;
                }
            },
            Err(e) => {
                tracing::warn!(
                    shot_id,
                    transport = e.is_transport(),
                    error = %e,
                    "Image generation failed",
                );
                self.fail_shot(shot_id).await;
                return;
            }
        };

        match self.store.complete_shot_image(shot_id, &url).await {
            Ok(true) => tracing::info!(shot_id, image_url = %url, "Shot image completed"),
            Ok(false) => tracing::warn!(shot_id, "Shot disappeared before image was recorded"),
            Err(e) => {
                tracing::error!(shot_id, error = %e, "Failed to record shot image");
                self.fail_shot(shot_id).await;
            }
        }
    }

    async fn fail_shot(&self, shot_id: DbId) {
        if let Err(e) = self
            .store
            .set_shot_status(shot_id, GenerationStatus::Failed)
            .await
        {
            tracing::error!(shot_id, error = %e, "Failed to mark shot failed");
        }
    }
}
