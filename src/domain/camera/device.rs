//! Camera devices and the operating modes they advertise

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a camera sits on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraPosition {
    Back,
    Front,
    External,
}

/// Hardware operating mode of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMode {
    NormalPhoto,
    NormalVideo,
    SecurePhoto,
}

impl SceneMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NormalPhoto => "normal-photo",
            Self::NormalVideo => "normal-video",
            Self::SecurePhoto => "secure-photo",
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A camera enumerated by the capability query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    pub id: String,
    pub position: CameraPosition,
}

impl CameraDevice {
    pub fn new(id: impl Into<String>, position: CameraPosition) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

impl fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.id, self.position)
    }
}
