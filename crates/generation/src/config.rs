use std::time::Duration;

/// Endpoints and timeouts for the generation services.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Storyboard (LLM) endpoint, full URL.
    pub storyboard_url: String,
    /// Image generation endpoint, full URL.
    pub image_url: String,
    /// Video composition endpoint, full URL.
    pub video_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub timeout_secs: u64,
}

impl GenerationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                            |
    /// |---------------------------|------------------------------------|
    /// | `STORYBOARD_API_URL`      | `http://localhost:8001/storyboard` |
    /// | `IMAGE_API_URL`           | `http://localhost:8002/image`      |
    /// | `VIDEO_API_URL`           | `http://localhost:8003/video`      |
    /// | `GENERATION_TIMEOUT_SECS` | `300`                              |
    pub fn from_env() -> Self {
        let storyboard_url = std::env::var("STORYBOARD_API_URL")
            .unwrap_or_else(|_| "http://localhost:8001/storyboard".into());
        let image_url = std::env::var("IMAGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8002/image".into());
        let video_url = std::env::var("VIDEO_API_URL")
            .unwrap_or_else(|_| "http://localhost:8003/video".into());

        let timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        Self {
            storyboard_url,
            image_url,
            video_url,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
