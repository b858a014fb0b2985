//! Pinch zoom value objects

mod state;

pub use state::{ZoomRange, ZoomState};
