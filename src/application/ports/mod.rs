//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod camera;
pub mod config;
pub mod notifier;
pub mod output;

// Re-export common types
pub use camera::{
    CameraError, CameraInput, CameraManager, HandleId, PreviewOutput, VideoOutput, VideoSession,
};
pub use config::ConfigStore;
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use output::{OutputError, OutputFile, OutputFiles};
