//! Shared domain types for the story-to-video pipeline.
//!
//! This crate has no I/O dependencies. It holds identifiers, the domain
//! error taxonomy, the generation status enum, and the pure validation and
//! normalisation helpers used by the pipeline and the API layer.

pub mod error;
pub mod status;
pub mod story;
pub mod types;
