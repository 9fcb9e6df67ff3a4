//! Clients for the three external generation services.
//!
//! The pipeline talks to the storyboard (LLM), image and video services
//! through the traits in [`services`]. [`client::GenerationClient`] is the
//! HTTP implementation; wire formats live in [`messages`].

pub mod client;
pub mod config;
pub mod messages;
pub mod services;

pub use client::{GenerationClient, GenerationError};
pub use config::GenerationConfig;
pub use services::{GenerationServices, ImageService, StoryboardService, VideoService};
