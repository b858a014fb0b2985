//! Capture session lifecycle types

mod operation;
mod state;

pub use operation::{Operation, TEARDOWN_ORDER};
pub use state::{InvalidStateTransition, LifecycleState, SessionLifecycle};
