//! Story pipeline constants and validation.
//!
//! Pure helpers shared by the orchestrator and the API layer. All inputs
//! are passed in by the caller; nothing here touches the database or the
//! network.

use crate::error::CoreError;
use crate::status::GenerationStatus;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Generation policy
// ---------------------------------------------------------------------------

/// Image size requested for every shot. One aspect ratio for the whole
/// pipeline so the composed video never mixes frame sizes.
pub const SHOT_IMAGE_SIZE: &str = "1024x576";

/// Message returned when video composition is requested before the
/// storyboard stage has produced any shots.
pub const STORYBOARD_NOT_READY: &str = "Storyboard not yet generated for this story";

/// Message returned when a shot is edited or regenerated while an image job
/// still owns it.
pub const SHOT_GENERATION_IN_PROGRESS: &str = "Image generation is already running for this shot";

/// Message surfaced by the preview endpoint when composition failed.
pub const VIDEO_GENERATION_FAILED: &str = "Video generation failed";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the submitted story text. Blank or whitespace-only content is
/// rejected because the storyboard service has nothing to work from.
pub fn validate_story_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Ensure a story has at least one shot before video composition.
pub fn ensure_storyboard_ready(shot_count: usize) -> Result<(), CoreError> {
    if shot_count == 0 {
        return Err(CoreError::PreconditionFailed(
            STORYBOARD_NOT_READY.to_string(),
        ));
    }
    Ok(())
}

/// Explain why a guarded shot write (edit or regeneration) matched no row.
///
/// `stored_status` is the shot's status as read back after the write, or
/// `None` if the row does not exist. An existing row was skipped because an
/// image job owned it; a status outside [`crate::status::VALID_STATUSES`]
/// means the row is corrupt.
pub fn shot_write_rejection(id: DbId, stored_status: Option<&str>) -> CoreError {
    let Some(raw) = stored_status else {
        return CoreError::NotFound { entity: "Shot", id };
    };
    match GenerationStatus::from_str_value(raw) {
        Ok(_) => CoreError::PreconditionFailed(SHOT_GENERATION_IN_PROGRESS.to_string()),
        Err(msg) => CoreError::Internal(format!("shot {id}: {msg}")),
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Treat an empty or whitespace-only URL as absent.
pub fn non_empty_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse the duration string returned by the video service into seconds.
///
/// Accepts plain numbers (`"12"`, `"12.5"`) with an optional trailing `s`.
/// Returns `None` for anything else, including negative or non-finite values.
pub fn parse_duration_secs(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('s').unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Some(secs),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
