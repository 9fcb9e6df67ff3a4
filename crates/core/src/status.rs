//! Generation lifecycle status shared by stories, shots and assets.
//!
//! Persisted as lowercase text in every table and serialized the same way
//! on the wire. Integer encodings are never accepted.

use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_GENERATING: &str = "generating";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

/// All valid status strings.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_GENERATING,
    STATUS_COMPLETED,
    STATUS_FAILED,
];

/// Lifecycle of a generation unit (storyboard, shot image, or video).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Created but no generation has started.
    Pending,
    /// A generation call is in flight.
    Generating,
    /// Generation finished and its output was persisted.
    Completed,
    /// Generation failed. Only a new trigger moves the unit out of this state.
    Failed,
}

impl GenerationStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_GENERATING => Ok(Self::Generating),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_FAILED => Ok(Self::Failed),
            _ => Err(format!(
                "Invalid status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Generating => STATUS_GENERATING,
            Self::Completed => STATUS_COMPLETED,
            Self::Failed => STATUS_FAILED,
        }
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
