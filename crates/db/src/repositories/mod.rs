//! Repository structs, one per table. Each exposes associated async
//! functions taking a pool (or an open transaction) and returning sqlx
//! results.

pub mod asset_repo;
pub mod shot_repo;
pub mod story_repo;

pub use asset_repo::AssetRepo;
pub use shot_repo::ShotRepo;
pub use story_repo::StoryRepo;
