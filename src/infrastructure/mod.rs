//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the simulated
//! camera stack, filesystem outputs, XDG config and notifications.

pub mod camera;
pub mod config;
pub mod notification;
pub mod output;

// Re-export adapters
pub use camera::{SimulatedCamera, SimulatedOutputs};
pub use config::XdgConfigStore;
pub use notification::{create_notifier, LogNotifier, NotifyRustNotifier};
pub use output::FileOutputs;
