//! Application layer - Use cases and port interfaces
//!
//! Contains the session lifecycle, zoom and timer use cases, the facade
//! composing them, and trait definitions for external system interactions.

pub mod facade;
pub mod lifecycle;
pub mod ports;
pub mod timer;
pub mod zoom;

// Re-export use cases
pub use facade::{FacadeConfig, SessionFacade};
pub use lifecycle::{
    ReleaseWarning, SessionController, SessionError, SessionOptions, TeardownReport,
};
pub use timer::RecordingTimer;
pub use zoom::{ZoomControl, ZoomController};
