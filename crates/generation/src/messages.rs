//! Request and response bodies exchanged with the generation services.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Storyboard
// ---------------------------------------------------------------------------

/// `POST` body for the storyboard service.
#[derive(Debug, Clone, Serialize)]
pub struct StoryboardRequest<'a> {
    pub story: &'a str,
}

/// One scene descriptor in a storyboard response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoryboardShot {
    #[serde(rename = "sortOrder")]
    pub sort_order: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub narration: String,
    #[serde(default)]
    pub transition: String,
}

/// Storyboard service response: a derived title plus ordered scenes.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryboardResponse {
    #[serde(default)]
    pub title: String,
    pub shots: Vec<StoryboardShot>,
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// `POST` body for the image service.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest<'a> {
    pub prompt: &'a str,
    pub size: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub image_url: String,
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// One scene of the composition request, in render order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoShot {
    pub image_url: String,
    pub narration: String,
    pub transition: String,
}

/// `POST` body for the video service. The story id travels as a string.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoRequest {
    pub story_id: String,
    pub shots: Vec<VideoShot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoResponse {
    #[serde(default)]
    pub video_url: String,
    /// Seconds, sent as a string. Bare numbers are tolerated.
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
