//! Camera driver port interface
//!
//! Mirrors the native camera stack: a manager that enumerates devices and
//! creates handles, plus one trait per handle kind. Handles are boxed so the
//! lifecycle controller can own them as `Option`s and drop them individually.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::camera::{
    CameraDevice, ColorSpace, OutputCapability, PreviewProfile, SceneMode, StabilizationMode,
    StreamKind, VideoProfile,
};
use crate::domain::zoom::ZoomRange;

/// Camera driver errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Camera device disconnected")]
    Disconnected,

    #[error("Camera is busy or in use by another client")]
    Busy,

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Driver error {code}: {message}")]
    Driver { code: i32, message: String },
}

/// Opaque identifier of a driver-side handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Port for the camera manager
#[async_trait]
pub trait CameraManager: Send + Sync {
    /// List attached cameras, in the driver's preferred order
    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, CameraError>;

    /// Scene modes the device can run
    fn supported_scene_modes(&self, device: &CameraDevice) -> Vec<SceneMode>;

    /// Profiles the device advertises for a scene mode, in enumeration order
    fn output_capability(
        &self,
        device: &CameraDevice,
        mode: SceneMode,
    ) -> Result<OutputCapability, CameraError>;

    fn create_input(&self, device: &CameraDevice) -> Result<Box<dyn CameraInput>, CameraError>;

    fn create_preview_output(
        &self,
        profile: &PreviewProfile,
        surface_id: &str,
    ) -> Result<Box<dyn PreviewOutput>, CameraError>;

    fn create_video_output(
        &self,
        profile: &VideoProfile,
        surface_id: &str,
    ) -> Result<Box<dyn VideoOutput>, CameraError>;

    fn create_session(&self, mode: SceneMode) -> Result<Box<dyn VideoSession>, CameraError>;
}

/// Device input handle
#[async_trait]
pub trait CameraInput: Send + Sync {
    fn handle(&self) -> HandleId;

    async fn open(&self) -> Result<(), CameraError>;

    async fn close(&self) -> Result<(), CameraError>;
}

/// Preview stream output handle
#[async_trait]
pub trait PreviewOutput: Send + Sync {
    fn handle(&self) -> HandleId;

    async fn release(&self) -> Result<(), CameraError>;
}

/// Encoder stream output handle
#[async_trait]
pub trait VideoOutput: Send + Sync {
    fn handle(&self) -> HandleId;

    async fn start(&self) -> Result<(), CameraError>;

    async fn stop(&self) -> Result<(), CameraError>;

    async fn release(&self) -> Result<(), CameraError>;
}

/// Hardware session grouping one input and its outputs.
///
/// Configuration calls must be bracketed by `begin_config` and
/// `commit_config`. Tuning and zoom calls are only meaningful after commit.
#[async_trait]
pub trait VideoSession: Send + Sync {
    fn begin_config(&self) -> Result<(), CameraError>;

    fn add_input(&self, input: HandleId) -> Result<(), CameraError>;

    fn add_output(&self, output: HandleId, kind: StreamKind) -> Result<(), CameraError>;

    async fn commit_config(&self) -> Result<(), CameraError>;

    async fn start(&self) -> Result<(), CameraError>;

    async fn stop(&self) -> Result<(), CameraError>;

    async fn release(&self) -> Result<(), CameraError>;

    fn is_stabilization_supported(&self, mode: StabilizationMode) -> Result<bool, CameraError>;

    fn set_stabilization_mode(&self, mode: StabilizationMode) -> Result<(), CameraError>;

    fn active_stabilization_mode(&self) -> Result<StabilizationMode, CameraError>;

    fn supported_color_spaces(&self) -> Result<Vec<ColorSpace>, CameraError>;

    fn set_color_space(&self, color_space: ColorSpace) -> Result<(), CameraError>;

    fn active_color_space(&self) -> Result<ColorSpace, CameraError>;

    fn set_zoom_ratio(&self, ratio: f64) -> Result<(), CameraError>;

    /// Ratio the hardware actually applied, after its own rounding
    fn zoom_ratio(&self) -> Result<f64, CameraError>;

    fn zoom_range(&self) -> Result<ZoomRange, CameraError>;
}
