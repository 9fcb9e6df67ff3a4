pub mod shot;
pub mod story;
