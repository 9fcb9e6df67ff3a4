//! Service traits the pipeline depends on.
//!
//! Each call is a single synchronous request/response; implementations do
//! not retry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{GenerationClient, GenerationError};
use crate::messages::{StoryboardResponse, VideoRequest, VideoResponse};

/// Turns story text into a titled, ordered storyboard.
#[async_trait]
pub trait StoryboardService: Send + Sync {
    async fn generate_storyboard(&self, story: &str) -> Result<StoryboardResponse, GenerationError>;
}

/// Renders one image for a prompt, returning its URL.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate_image(&self, prompt: &str, size: &str) -> Result<String, GenerationError>;
}

/// Composes a video from ordered shots.
#[async_trait]
pub trait VideoService: Send + Sync {
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoResponse, GenerationError>;
}

/// The three generation back-ends, cheaply cloneable into background tasks.
#[derive(Clone)]
pub struct GenerationServices {
    pub storyboard: Arc<dyn StoryboardService>,
    pub image: Arc<dyn ImageService>,
    pub video: Arc<dyn VideoService>,
}

impl GenerationServices {
    /// Use one HTTP client for all three services.
    pub fn from_client(client: GenerationClient) -> Self {
        let client = Arc::new(client);
        Self {
            storyboard: client.clone(),
            image: client.clone(),
            video: client,
        }
    }
}
