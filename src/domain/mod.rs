//! Domain layer - Core business logic
//!
//! Contains value objects, the session state machine, profile negotiation
//! and domain errors. This layer has no dependencies on external systems.

pub mod camera;
pub mod config;
pub mod error;
pub mod recording;
pub mod session;
pub mod zoom;

// Re-export common types
pub use camera::{NegotiatedProfiles, ProfileNotFound, Size};
pub use config::AppConfig;
pub use error::*;
pub use recording::{
    OutputTarget, RecordingClock, RecordingLimit, RecordingRequest, Resolution, VideoCodec,
};
pub use session::{InvalidStateTransition, LifecycleState, Operation, SessionLifecycle};
pub use zoom::{ZoomRange, ZoomState};
