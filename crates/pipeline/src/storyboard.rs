//! Storyboard stage: story text to committed shots, then image fan-out.

use storyreel_core::status::GenerationStatus;
use storyreel_core::types::DbId;
use storyreel_db::models::shot::CreateShot;
use storyreel_generation::messages::StoryboardResponse;

use crate::orchestrator::Orchestrator;

/// Map storyboard descriptors to shot rows, one per descriptor, in the
/// order received.
///
/// `sort_order` is copied verbatim. The row's `transition` carries the
/// descriptor's narration: the storyboard schema narrates the transition
/// rather than naming an effect.
pub fn build_shot_rows(response: &StoryboardResponse) -> Vec<CreateShot> {
    response
        .shots
        .iter()
        .map(|item| CreateShot {
            sort_order: item.sort_order,
            title: item.title.clone(),
            prompt: item.prompt.clone(),
            narration: item.narration.clone(),
            transition: item.narration.clone(),
            status: GenerationStatus::Generating.as_str().to_string(),
        })
        .collect()
}

impl Orchestrator {
    /// Run the storyboard stage for a story in the background.
    pub(crate) fn launch_storyboard(&self, story_id: DbId, content: String) {
        let this = self.clone();
        self.tasks.spawn(async move {
            this.run_storyboard_stage(story_id, content).await;
        });
    }

    /// Call the storyboard service and commit its shots atomically.
    ///
    /// Owns the story row for the duration of the stage. Any failure leaves
    /// the story `failed` with no shot rows.
    async fn run_storyboard_stage(&self, story_id: DbId, content: String) {
        if let Err(e) = self
            .store
            .set_story_status(story_id, GenerationStatus::Generating)
            .await
        {
            tracing::error!(story_id, error = %e, "Failed to mark story generating");
        }

        let response = match self.services.storyboard.generate_storyboard(&content).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    story_id,
                    transport = e.is_transport(),
                    error = %e,
                    "Storyboard generation failed",
                );
                self.fail_story(story_id).await;
                return;
            }
        };

        let rows = build_shot_rows(&response);
        if rows.is_empty() {
            tracing::warn!(story_id, "Storyboard contained no shots");
            self.fail_story(story_id).await;
            return;
        }

        let shots = match self
            .store
            .commit_storyboard(story_id, &response.title, &rows)
            .await
        {
            Ok(shots) => shots,
            Err(e) => {
                tracing::error!(story_id, error = %e, "Storyboard commit rolled back");
                self.fail_story(story_id).await;
                return;
            }
        };

        tracing::info!(
            story_id,
            title = %response.title,
            shot_count = shots.len(),
            "Storyboard committed, launching image generation",
        );

        for shot in shots {
            self.launch_image(shot.id, shot.prompt);
        }
    }

    /// Record a storyboard failure. Store errors here are logged only.
    async fn fail_story(&self, story_id: DbId) {
        match self
            .store
            .set_story_status(story_id, GenerationStatus::Failed)
            .await
        {
            Ok(true) => {}
            Ok(false) => tracing::warn!(story_id, "Story disappeared before failure was recorded"),
            Err(e) => tracing::error!(story_id, error = %e, "Failed to mark story failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
