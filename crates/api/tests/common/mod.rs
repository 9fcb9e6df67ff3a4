#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use storyreel_api::config::ServerConfig;
use storyreel_api::router::build_app_router;
use storyreel_api::state::AppState;
use storyreel_db::memory::MemoryStore;
use storyreel_generation::messages::{StoryboardResponse, StoryboardShot, VideoRequest, VideoResponse};
use storyreel_generation::{
    GenerationError, GenerationServices, ImageService, StoryboardService, VideoService,
};
use storyreel_pipeline::Orchestrator;

// ---------------------------------------------------------------------------
// Canned generation services
// ---------------------------------------------------------------------------

/// Returns a two-shot storyboard, or a 500 when the story mentions "fail".
struct CannedStoryboard;

#[async_trait]
impl StoryboardService for CannedStoryboard {
    async fn generate_storyboard(&self, story: &str) -> Result<StoryboardResponse, GenerationError> {
        if story.contains("fail") {
            return Err(GenerationError::Status {
                status: 500,
                body: "model overloaded".to_string(),
            });
        }
        Ok(StoryboardResponse {
            title: "The Cat".to_string(),
            shots: vec![
                StoryboardShot {
                    sort_order: 1,
                    title: "Wake".to_string(),
                    prompt: "a cat waking up".to_string(),
                    narration: "The cat wakes.".to_string(),
                    transition: "fade".to_string(),
                },
                StoryboardShot {
                    sort_order: 2,
                    title: "Eat".to_string(),
                    prompt: "a cat eating".to_string(),
                    narration: "The cat eats.".to_string(),
                    transition: "cut".to_string(),
                },
            ],
        })
    }
}

struct CannedImage;

#[async_trait]
impl ImageService for CannedImage {
    async fn generate_image(&self, prompt: &str, _size: &str) -> Result<String, GenerationError> {
        Ok(format!("https://cdn.test/img/{}.png", prompt.replace(' ', "-")))
    }
}

struct CannedVideo;

#[async_trait]
impl VideoService for CannedVideo {
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoResponse, GenerationError> {
        Ok(VideoResponse {
            video_url: format!("https://cdn.test/video/{}.mp4", request.story_id),
            duration: "15".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 1,
    }
}

/// A router plus handles for waiting on background work and inspecting
/// the store.
pub struct TestApp {
    pub router: Router,
    pub orchestrator: Orchestrator,
    pub store: Arc<MemoryStore>,
}

/// Build the full application router, with the production middleware
/// stack, over a memory store and canned generation services.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Same as [`build_test_app`] with a caller-supplied server config.
pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let services = GenerationServices {
        storyboard: Arc::new(CannedStoryboard),
        image: Arc::new(CannedImage),
        video: Arc::new(CannedVideo),
    };
    let orchestrator = Orchestrator::new(store.clone(), services);
    let state = AppState {
        orchestrator: orchestrator.clone(),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        orchestrator,
        store,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// POST a body verbatim with a JSON content type, for malformed payloads.
pub async fn post_raw(app: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_empty(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit a story and wait for its storyboard and image stages.
pub async fn submit_and_settle(app: &TestApp, content: &str) -> i64 {
    let response = post_json(
        &app.router,
        "/api/story",
        serde_json::json!({ "content": content, "style": "watercolor" }),
    )
    .await;
    let json = body_json(response).await;
    app.orchestrator.wait_idle().await;
    json["data"]["story_id"].as_i64().unwrap()
}
