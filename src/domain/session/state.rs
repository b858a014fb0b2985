//! Capture session lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Lifecycle states of one capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Opening,
    Configuring,
    Running,
    Stopping,
    Released,
}

impl LifecycleState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Opening => "opening",
            Self::Configuring => "configuring",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Released => "released",
        }
    }

    /// Position along the forward path, used to check monotonic progress
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Opening => 1,
            Self::Configuring => 2,
            Self::Running => 3,
            Self::Stopping => 4,
            Self::Released => 5,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an operation is attempted in a state that does not permit it
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: LifecycleState,
    pub action: String,
}

impl InvalidStateTransition {
    pub fn new(current_state: LifecycleState, action: impl Into<String>) -> Self {
        Self {
            current_state,
            action: action.into(),
        }
    }
}

/// Lifecycle of a single capture session.
///
/// State machine:
///   IDLE -> OPENING (begin_opening)
///   OPENING -> CONFIGURING (begin_configuring)
///   OPENING -> IDLE (abort_opening, nothing acquired yet)
///   CONFIGURING -> RUNNING (mark_running)
///   OPENING | CONFIGURING | RUNNING -> STOPPING (begin_stopping)
///   STOPPING -> RELEASED (mark_released)
///
/// RELEASED is terminal; a new recording needs a new lifecycle.
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    state: LifecycleState,
}

impl SessionLifecycle {
    /// Create a lifecycle in idle state
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Idle,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Stopping or released: teardown already happened or is underway
    pub fn is_torn_down(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Stopping | LifecycleState::Released
        )
    }

    /// Transition from IDLE to OPENING
    pub fn begin_opening(&mut self) -> Result<(), InvalidStateTransition> {
        self.advance(&[LifecycleState::Idle], LifecycleState::Opening, "open camera")
    }

    /// Transition from OPENING to CONFIGURING
    pub fn begin_configuring(&mut self) -> Result<(), InvalidStateTransition> {
        self.advance(
            &[LifecycleState::Opening],
            LifecycleState::Configuring,
            "configure session",
        )
    }

    /// Transition from OPENING back to IDLE.
    /// Only valid before any hardware handle exists.
    pub fn abort_opening(&mut self) -> Result<(), InvalidStateTransition> {
        self.advance(&[LifecycleState::Opening], LifecycleState::Idle, "abort opening")
    }

    /// Transition from CONFIGURING to RUNNING
    pub fn mark_running(&mut self) -> Result<(), InvalidStateTransition> {
        self.advance(
            &[LifecycleState::Configuring],
            LifecycleState::Running,
            "start session",
        )
    }

    /// Transition into STOPPING from any state that may hold hardware
    pub fn begin_stopping(&mut self) -> Result<(), InvalidStateTransition> {
        self.advance(
            &[
                LifecycleState::Opening,
                LifecycleState::Configuring,
                LifecycleState::Running,
            ],
            LifecycleState::Stopping,
            "stop session",
        )
    }

    /// Transition from STOPPING to RELEASED
    pub fn mark_released(&mut self) -> Result<(), InvalidStateTransition> {
        self.advance(
            &[LifecycleState::Stopping],
            LifecycleState::Released,
            "release session",
        )
    }

    fn advance(
        &mut self,
        from: &[LifecycleState],
        to: LifecycleState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if !from.contains(&self.state) {
            return Err(InvalidStateTransition::new(self.state, action));
        }
        self.state = to;
        Ok(())
    }
}
