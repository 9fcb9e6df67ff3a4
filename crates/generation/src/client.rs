//! HTTP client for the storyboard, image and video services.
//!
//! Wraps the three JSON-over-POST endpoints using [`reqwest`]. A response
//! is accepted only with status `200 OK` and a body that decodes into the
//! expected shape; everything else is a [`GenerationError`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GenerationConfig;
use crate::messages::{
    ImageRequest, ImageResponse, StoryboardRequest, StoryboardResponse, VideoRequest,
    VideoResponse,
};
use crate::services::{ImageService, StoryboardService, VideoService};

/// Errors from the generation service layer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status other than `200 OK`.
    #[error("Generation service error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body could not be decoded into the expected response.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// A success envelope without the payload the caller needs.
    #[error("Response is missing {0}")]
    EmptyPayload(&'static str),
}

impl GenerationError {
    /// `true` for network-level failures, `false` for protocol failures
    /// (bad status, undecodable or empty payload).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Client for all three generation endpoints.
pub struct GenerationClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    // ---- private helpers ----

    /// `POST` a JSON body and decode a `200 OK` JSON response.
    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(url, bytes = text.len(), "Generation service responded");
        decode_body(&text)
    }
}

/// Decode a response body, mapping serde failures to [`GenerationError::Decode`].
fn decode_body<R: DeserializeOwned>(text: &str) -> Result<R, GenerationError> {
    serde_json::from_str(text).map_err(|e| GenerationError::Decode(e.to_string()))
}

#[async_trait]
impl StoryboardService for GenerationClient {
    async fn generate_storyboard(&self, story: &str) -> Result<StoryboardResponse, GenerationError> {
        let response: StoryboardResponse = self
            .post_json(&self.config.storyboard_url, &StoryboardRequest { story })
            .await?;
        if response.shots.is_empty() {
            return Err(GenerationError::EmptyPayload("shots"));
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageService for GenerationClient {
    async fn generate_image(&self, prompt: &str, size: &str) -> Result<String, GenerationError> {
        let response: ImageResponse = self
            .post_json(&self.config.image_url, &ImageRequest { prompt, size })
            .await?;
        match storyreel_core::story::non_empty_url(&response.image_url) {
            Some(url) => Ok(url.to_string()),
            None => Err(GenerationError::EmptyPayload("image_url")),
        }
    }
}

#[async_trait]
impl VideoService for GenerationClient {
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoResponse, GenerationError> {
        self.post_json(&self.config.video_url, request).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response on a loopback port. The handle
    /// yields the request body the client sent.
    async fn serve_once(status_line: &str, body: &str) -> (GenerationConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        let config = GenerationConfig {
            storyboard_url: format!("http://{addr}/storyboard"),
            image_url: format!("http://{addr}/image"),
            video_url: format!("http://{addr}/video"),
            timeout_secs: 5,
        };
        (config, handle)
    }

    /// Read one request and return its body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length || n == 0 {
                    return String::from_utf8_lossy(&buf[end + 4..]).into_owned();
                }
            } else if n == 0 {
                return String::new();
            }
        }
    }

    fn unreachable_config() -> GenerationConfig {
        // Port 9 (discard) on loopback is closed in test environments.
        GenerationConfig {
            storyboard_url: "http://127.0.0.1:9/storyboard".to_string(),
            image_url: "http://127.0.0.1:9/image".to_string(),
            video_url: "http://127.0.0.1:9/video".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn decode_body_reports_invalid_json() {
        let err = decode_body::<ImageResponse>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn status_error_is_not_transport() {
        let err = GenerationError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "Generation service error (502): bad gateway"
        );
    }

    #[test]
    fn empty_payload_display() {
        let err = GenerationError::EmptyPayload("image_url");
        assert_eq!(err.to_string(), "Response is missing image_url");
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let client = GenerationClient::new(unreachable_config()).unwrap();
        let err = client.generate_image("a cat", "1024x576").await.unwrap_err();
        assert!(err.is_transport(), "expected transport error, got {err}");
    }

    #[tokio::test]
    async fn image_posts_prompt_and_size() {
        let (config, server) =
            serve_once("200 OK", r#"{"image_url":"https://cdn.test/a.png"}"#).await;
        let client = GenerationClient::new(config).unwrap();

        let url = client.generate_image("a cat", "1024x576").await.unwrap();
        assert_eq!(url, "https://cdn.test/a.png");

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["prompt"], "a cat");
        assert_eq!(sent["size"], "1024x576");
    }

    #[tokio::test]
    async fn created_with_valid_body_is_status_error() {
        let (config, server) =
            serve_once("201 Created", r#"{"image_url":"https://cdn.test/a.png"}"#).await;
        let client = GenerationClient::new(config).unwrap();

        let err = client.generate_image("a cat", "1024x576").await.unwrap_err();
        assert!(
            matches!(&err, GenerationError::Status { status: 201, .. }),
            "expected status error, got {err}"
        );
        assert!(!err.is_transport());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn server_error_keeps_response_body() {
        let (config, server) = serve_once("500 Internal Server Error", r#"{"detail":"gpu lost"}"#).await;
        let client = GenerationClient::new(config).unwrap();

        let err = client.generate_image("a cat", "1024x576").await.unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"detail":"gpu lost"}"#);
            }
            other => panic!("expected status error, got {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn ok_with_invalid_json_is_decode_error() {
        let (config, server) = serve_once("200 OK", "not json").await;
        let client = GenerationClient::new(config).unwrap();

        let err = client.generate_image("a cat", "1024x576").await.unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)), "got {err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn ok_with_empty_image_url_is_empty_payload() {
        let (config, server) = serve_once("200 OK", r#"{"image_url":""}"#).await;
        let client = GenerationClient::new(config).unwrap();

        let err = client.generate_image("a cat", "1024x576").await.unwrap_err();
        assert!(
            matches!(err, GenerationError::EmptyPayload("image_url")),
            "got {err}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn storyboard_without_shots_is_empty_payload() {
        let (config, server) = serve_once("200 OK", r#"{"title":"Nothing","shots":[]}"#).await;
        let client = GenerationClient::new(config).unwrap();

        let err = client.generate_storyboard("a story").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyPayload("shots")), "got {err}");

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["story"], "a story");
    }

    #[tokio::test]
    async fn video_accepts_numeric_duration() {
        let (config, server) =
            serve_once("200 OK", r#"{"video_url":"https://cdn.test/v.mp4","duration":15}"#).await;
        let client = GenerationClient::new(config).unwrap();
        let request = VideoRequest {
            story_id: "7".to_string(),
            shots: Vec::new(),
        };

        let response = client.generate_video(&request).await.unwrap();
        assert_eq!(response.video_url, "https://cdn.test/v.mp4");
        assert_eq!(response.duration, "15");
        server.await.unwrap();
    }
}
