//! Shared fixtures for pipeline integration tests.
//!
//! Generation services are replaced by scripted mocks that record every
//! call; records live in a [`MemoryStore`].

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use storyreel_db::memory::MemoryStore;
use storyreel_generation::messages::{StoryboardResponse, StoryboardShot, VideoRequest, VideoResponse};
use storyreel_generation::{
    GenerationError, GenerationServices, ImageService, StoryboardService, VideoService,
};
use storyreel_pipeline::Orchestrator;

type StoryboardFn = dyn Fn(&str) -> Result<StoryboardResponse, GenerationError> + Send + Sync;
type ImageFn = dyn Fn(&str) -> Result<String, GenerationError> + Send + Sync;
type VideoFn = dyn Fn(&VideoRequest) -> Result<VideoResponse, GenerationError> + Send + Sync;

// ---------------------------------------------------------------------------
// Mock services
// ---------------------------------------------------------------------------

pub struct MockStoryboard {
    respond: Box<StoryboardFn>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl StoryboardService for MockStoryboard {
    async fn generate_storyboard(&self, story: &str) -> Result<StoryboardResponse, GenerationError> {
        self.calls.lock().unwrap().push(story.to_string());
        (self.respond)(story)
    }
}

pub struct MockImage {
    respond: Box<ImageFn>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ImageService for MockImage {
    async fn generate_image(&self, prompt: &str, size: &str) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), size.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(prompt)
    }
}

pub struct MockVideo {
    respond: Box<VideoFn>,
    calls: Mutex<Vec<VideoRequest>>,
}

#[async_trait]
impl VideoService for MockVideo {
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoResponse, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.respond)(request)
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// An orchestrator wired to a memory store and recording mocks.
pub struct Harness {
    pub orchestrator: Orchestrator,
    pub store: Arc<MemoryStore>,
    pub storyboard: Arc<MockStoryboard>,
    pub image: Arc<MockImage>,
    pub video: Arc<MockVideo>,
}

impl Harness {
    pub fn storyboard_calls(&self) -> Vec<String> {
        self.storyboard.calls.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<(String, String)> {
        self.image.calls.lock().unwrap().clone()
    }

    pub fn video_calls(&self) -> Vec<VideoRequest> {
        self.video.calls.lock().unwrap().clone()
    }
}

/// Builder for a [`Harness`]. Defaults to the two-shot cat storyboard, an
/// image URL derived from the prompt and a 15 second video.
pub struct HarnessBuilder {
    storyboard: Box<StoryboardFn>,
    image: Box<ImageFn>,
    image_delay: Option<Duration>,
    video: Box<VideoFn>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            storyboard: Box::new(|_| Ok(cat_storyboard())),
            image: Box::new(|prompt| Ok(image_url_for(prompt))),
            image_delay: None,
            video: Box::new(|req| {
                Ok(VideoResponse {
                    video_url: format!("https://cdn.test/video/{}.mp4", req.story_id),
                    duration: "15".to_string(),
                })
            }),
        }
    }
}

impl HarnessBuilder {
    pub fn storyboard(
        mut self,
        f: impl Fn(&str) -> Result<StoryboardResponse, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        self.storyboard = Box::new(f);
        self
    }

    pub fn image(
        mut self,
        f: impl Fn(&str) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        self.image = Box::new(f);
        self
    }

    /// Hold every image call open for `delay` before responding.
    pub fn image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = Some(delay);
        self
    }

    pub fn video(
        mut self,
        f: impl Fn(&VideoRequest) -> Result<VideoResponse, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        self.video = Box::new(f);
        self
    }

    pub fn build(self) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let storyboard = Arc::new(MockStoryboard {
            respond: self.storyboard,
            calls: Mutex::new(Vec::new()),
        });
        let image = Arc::new(MockImage {
            respond: self.image,
            delay: self.image_delay,
            calls: Mutex::new(Vec::new()),
        });
        let video = Arc::new(MockVideo {
            respond: self.video,
            calls: Mutex::new(Vec::new()),
        });
        let services = GenerationServices {
            storyboard: storyboard.clone(),
            image: image.clone(),
            video: video.clone(),
        };
        Harness {
            orchestrator: Orchestrator::new(store.clone(), services),
            store,
            storyboard,
            image,
            video,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn shot(sort_order: i32, prompt: &str, narration: &str) -> StoryboardShot {
    StoryboardShot {
        sort_order,
        title: format!("Scene {sort_order}"),
        prompt: prompt.to_string(),
        narration: narration.to_string(),
        transition: "fade".to_string(),
    }
}

pub fn cat_storyboard() -> StoryboardResponse {
    StoryboardResponse {
        title: "The Cat".to_string(),
        shots: vec![
            shot(1, "a cat waking up in the sun", "The cat wakes."),
            shot(2, "a cat eating breakfast", "The cat eats."),
        ],
    }
}

pub fn image_url_for(prompt: &str) -> String {
    format!("https://cdn.test/img/{}.png", prompt.replace(' ', "-"))
}

pub fn status_error(status: u16) -> GenerationError {
    GenerationError::Status {
        status,
        body: "upstream failure".to_string(),
    }
}
