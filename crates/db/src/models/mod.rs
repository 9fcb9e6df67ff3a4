pub mod asset;
pub mod shot;
pub mod story;
