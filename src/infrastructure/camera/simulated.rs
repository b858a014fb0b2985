//! In-process simulated camera stack
//!
//! Behaves like a driver: enforces config bracketing, rounds zoom the way
//! hardware does, and sleeps on async calls. Every call is journaled and any
//! operation can be made to fail, which is what the tests drive.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use crate::application::ports::{
    CameraError, CameraInput, CameraManager, HandleId, OutputError, OutputFile, OutputFiles,
    PreviewOutput, VideoOutput, VideoSession,
};
use crate::domain::camera::{
    CameraDevice, CameraPosition, ColorSpace, FrameRateRange, OutputCapability, PixelFormat,
    PreviewProfile, SceneMode, StabilizationMode, StreamKind, VideoProfile,
};
use crate::domain::recording::{OutputTarget, ALL_RESOLUTIONS};
use crate::domain::session::Operation;
use crate::domain::zoom::ZoomRange;

/// Driver error code reported for injected failures
pub const INJECTED_FAILURE_CODE: i32 = 7_400_201;

/// Zoom granularity of the simulated lens
const ZOOM_STEP: f64 = 0.01;

struct Shared {
    devices: Vec<CameraDevice>,
    scene_modes: Vec<SceneMode>,
    capability: OutputCapability,
    stabilization_modes: Vec<StabilizationMode>,
    color_spaces: Vec<ColorSpace>,
    zoom_range: ZoomRange,
    latency: Duration,
    journal: Mutex<Vec<Operation>>,
    failures: Mutex<HashSet<Operation>>,
    next_handle: AtomicU64,
}

impl Shared {
    /// Journal the call and fail it if injected
    fn step(&self, operation: Operation) -> Result<(), CameraError> {
        self.journal.lock().push(operation);
        trace!(%operation, "Simulated camera call");
        if self.failures.lock().contains(&operation) {
            return Err(CameraError::Driver {
                code: INJECTED_FAILURE_CODE,
                message: format!("injected failure in {}", operation),
            });
        }
        Ok(())
    }

    async fn step_async(&self, operation: Operation) -> Result<(), CameraError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.step(operation)
    }

    fn next_handle(&self) -> HandleId {
        HandleId(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }
}

/// Simulated camera manager
#[derive(Clone)]
pub struct SimulatedCamera {
    shared: Arc<Shared>,
}

impl SimulatedCamera {
    /// One back camera with the full SDR and HDR profile table
    pub fn new() -> Self {
        Self::with_capability(Self::default_capability())
    }

    /// One back camera advertising the given profiles
    pub fn with_capability(capability: OutputCapability) -> Self {
        Self::build(
            vec![CameraDevice::new("sim-back-0", CameraPosition::Back)],
            vec![SceneMode::NormalPhoto, SceneMode::NormalVideo],
            capability,
            Duration::ZERO,
        )
    }

    /// A camera with no devices attached
    pub fn without_devices() -> Self {
        Self::build(
            Vec::new(),
            Vec::new(),
            OutputCapability::default(),
            Duration::ZERO,
        )
    }

    /// A camera that only supports photo scene modes
    pub fn photo_only() -> Self {
        Self::build(
            vec![CameraDevice::new("sim-front-0", CameraPosition::Front)],
            vec![SceneMode::NormalPhoto, SceneMode::SecurePhoto],
            Self::default_capability(),
            Duration::ZERO,
        )
    }

    fn build(
        devices: Vec<CameraDevice>,
        scene_modes: Vec<SceneMode>,
        capability: OutputCapability,
        latency: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                devices,
                scene_modes,
                capability,
                stabilization_modes: vec![
                    StabilizationMode::Off,
                    StabilizationMode::Low,
                    StabilizationMode::Auto,
                ],
                color_spaces: vec![
                    ColorSpace::Bt709Limit,
                    ColorSpace::Bt709Full,
                    ColorSpace::Bt2020HlgLimit,
                    ColorSpace::Bt2020HlgFull,
                ],
                zoom_range: ZoomRange::new(1.0, 10.0),
                latency,
                journal: Mutex::new(Vec::new()),
                failures: Mutex::new(HashSet::new()),
                next_handle: AtomicU64::new(1),
            }),
        }
    }

    /// Sleep this long inside every async driver call
    pub fn with_latency(self, latency: Duration) -> Self {
        self.reshape(|shared| shared.latency = latency)
    }

    /// Advertise no stabilization support
    pub fn without_stabilization(self) -> Self {
        self.reshape(|shared| shared.stabilization_modes.clear())
    }

    /// Advertise only these color spaces
    pub fn with_color_spaces(self, color_spaces: Vec<ColorSpace>) -> Self {
        self.reshape(|shared| shared.color_spaces = color_spaces)
    }

    /// Rebuild the shared state before any handle exists
    fn reshape(self, edit: impl FnOnce(&mut Shared)) -> Self {
        let shared = match Arc::try_unwrap(self.shared) {
            Ok(mut shared) => {
                edit(&mut shared);
                shared
            }
            Err(shared) => {
                let mut copy = Shared {
                    devices: shared.devices.clone(),
                    scene_modes: shared.scene_modes.clone(),
                    capability: shared.capability.clone(),
                    stabilization_modes: shared.stabilization_modes.clone(),
                    color_spaces: shared.color_spaces.clone(),
                    zoom_range: shared.zoom_range,
                    latency: shared.latency,
                    journal: Mutex::new(shared.journal.lock().clone()),
                    failures: Mutex::new(shared.failures.lock().clone()),
                    next_handle: AtomicU64::new(shared.next_handle.load(Ordering::Relaxed)),
                };
                edit(&mut copy);
                copy
            }
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Make every future call of `operation` fail
    pub fn fail_on(&self, operation: Operation) {
        self.shared.failures.lock().insert(operation);
    }

    pub fn clear_failures(&self) {
        self.shared.failures.lock().clear();
    }

    /// Every call made so far, in order
    pub fn journal(&self) -> Vec<Operation> {
        self.shared.journal.lock().clone()
    }

    pub fn clear_journal(&self) {
        self.shared.journal.lock().clear();
    }

    /// How many times `operation` was called
    pub fn count(&self, operation: Operation) -> usize {
        self.shared
            .journal
            .lock()
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    /// Output files that journal into this camera's journal
    pub fn outputs(&self) -> SimulatedOutputs {
        SimulatedOutputs {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Profiles for every resolution preset in 8-bit and 10-bit formats
    pub fn default_capability() -> OutputCapability {
        let mut capability = Self::sdr_only_capability();
        for resolution in ALL_RESOLUTIONS {
            let size = resolution.size();
            capability
                .preview_profiles
                .push(PreviewProfile::new(PixelFormat::YcrcbP010, size));
            for range in [FrameRateRange::new(1, 30), FrameRateRange::fixed(60)] {
                capability
                    .video_profiles
                    .push(VideoProfile::new(PixelFormat::YcbcrP010, size, range));
            }
        }
        capability
    }

    /// Profiles for every resolution preset in 8-bit 4:2:0 only
    pub fn sdr_only_capability() -> OutputCapability {
        let mut capability = OutputCapability::default();
        for resolution in ALL_RESOLUTIONS {
            let size = resolution.size();
            capability
                .preview_profiles
                .push(PreviewProfile::new(PixelFormat::Yuv420Sp, size));
            for range in [
                FrameRateRange::new(1, 30),
                FrameRateRange::fixed(30),
                FrameRateRange::fixed(60),
            ] {
                capability
                    .video_profiles
                    .push(VideoProfile::new(PixelFormat::Yuv420Sp, size, range));
            }
        }
        capability
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CameraManager for SimulatedCamera {
    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        self.shared.step_async(Operation::EnumerateDevices).await?;
        Ok(self.shared.devices.clone())
    }

    fn supported_scene_modes(&self, _device: &CameraDevice) -> Vec<SceneMode> {
        self.shared.scene_modes.clone()
    }

    fn output_capability(
        &self,
        device: &CameraDevice,
        mode: SceneMode,
    ) -> Result<OutputCapability, CameraError> {
        self.shared.step(Operation::QueryCapability)?;
        if !self.shared.devices.contains(device) {
            return Err(CameraError::Disconnected);
        }
        if !self.shared.scene_modes.contains(&mode) {
            return Err(CameraError::Unsupported(format!("scene mode {}", mode)));
        }
        Ok(self.shared.capability.clone())
    }

    fn create_input(&self, device: &CameraDevice) -> Result<Box<dyn CameraInput>, CameraError> {
        self.shared.step(Operation::CreateInput)?;
        if !self.shared.devices.contains(device) {
            return Err(CameraError::Disconnected);
        }
        Ok(Box::new(SimulatedInput {
            id: self.shared.next_handle(),
            shared: Arc::clone(&self.shared),
            opened: AtomicBool::new(false),
        }))
    }

    fn create_preview_output(
        &self,
        profile: &PreviewProfile,
        _surface_id: &str,
    ) -> Result<Box<dyn PreviewOutput>, CameraError> {
        self.shared.step(Operation::CreatePreviewOutput)?;
        if !self.shared.capability.preview_profiles.contains(profile) {
            return Err(CameraError::Unsupported(format!(
                "preview profile {} {}",
                profile.format, profile.size
            )));
        }
        Ok(Box::new(SimulatedPreview {
            id: self.shared.next_handle(),
            shared: Arc::clone(&self.shared),
        }))
    }

    fn create_video_output(
        &self,
        profile: &VideoProfile,
        _surface_id: &str,
    ) -> Result<Box<dyn VideoOutput>, CameraError> {
        self.shared.step(Operation::CreateVideoOutput)?;
        if !self.shared.capability.video_profiles.contains(profile) {
            return Err(CameraError::Unsupported(format!("video profile {}", profile)));
        }
        Ok(Box::new(SimulatedVideo {
            id: self.shared.next_handle(),
            shared: Arc::clone(&self.shared),
            streaming: AtomicBool::new(false),
        }))
    }

    fn create_session(&self, mode: SceneMode) -> Result<Box<dyn VideoSession>, CameraError> {
        self.shared.step(Operation::CreateSession)?;
        if !self.shared.scene_modes.contains(&mode) {
            return Err(CameraError::Unsupported(format!("scene mode {}", mode)));
        }
        Ok(Box::new(SimulatedSession {
            shared: Arc::clone(&self.shared),
            state: Mutex::new(SessionState::new(self.shared.zoom_range.min)),
        }))
    }
}

struct SimulatedInput {
    id: HandleId,
    shared: Arc<Shared>,
    opened: AtomicBool,
}

#[async_trait]
impl CameraInput for SimulatedInput {
    fn handle(&self) -> HandleId {
        self.id
    }

    async fn open(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::OpenInput).await?;
        if self.opened.swap(true, Ordering::SeqCst) {
            return Err(CameraError::Busy);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::CloseInput).await?;
        self.opened.store(false, Ordering::SeqCst);
        Ok(())
    }
}

struct SimulatedPreview {
    id: HandleId,
    shared: Arc<Shared>,
}

#[async_trait]
impl PreviewOutput for SimulatedPreview {
    fn handle(&self) -> HandleId {
        self.id
    }

    async fn release(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::ReleasePreviewOutput).await
    }
}

struct SimulatedVideo {
    id: HandleId,
    shared: Arc<Shared>,
    streaming: AtomicBool,
}

#[async_trait]
impl VideoOutput for SimulatedVideo {
    fn handle(&self) -> HandleId {
        self.id
    }

    async fn start(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::StartVideoOutput).await?;
        self.streaming.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::StopVideoOutput).await?;
        self.streaming.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn release(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::ReleaseVideoOutput).await
    }
}

struct SessionState {
    configuring: bool,
    committed: bool,
    inputs: Vec<HandleId>,
    outputs: Vec<(HandleId, StreamKind)>,
    stabilization: StabilizationMode,
    color_space: ColorSpace,
    zoom_ratio: f64,
}

impl SessionState {
    fn new(zoom_ratio: f64) -> Self {
        Self {
            configuring: false,
            committed: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
            stabilization: StabilizationMode::Off,
            color_space: ColorSpace::Bt709Limit,
            zoom_ratio,
        }
    }
}

struct SimulatedSession {
    shared: Arc<Shared>,
    state: Mutex<SessionState>,
}

impl SimulatedSession {
    fn driver_error(message: &str) -> CameraError {
        CameraError::Driver {
            code: 7_400_103,
            message: message.to_string(),
        }
    }

    fn require_committed(&self) -> Result<(), CameraError> {
        if self.state.lock().committed {
            Ok(())
        } else {
            Err(Self::driver_error("session not configured"))
        }
    }

    fn require_configuring(&self) -> Result<(), CameraError> {
        if self.state.lock().configuring {
            Ok(())
        } else {
            Err(Self::driver_error("config not begun"))
        }
    }
}

#[async_trait]
impl VideoSession for SimulatedSession {
    fn begin_config(&self) -> Result<(), CameraError> {
        self.shared.step(Operation::BeginConfig)?;
        let mut state = self.state.lock();
        if state.configuring {
            return Err(Self::driver_error("config already begun"));
        }
        state.configuring = true;
        Ok(())
    }

    fn add_input(&self, input: HandleId) -> Result<(), CameraError> {
        self.shared.step(Operation::AddInput)?;
        self.require_configuring()?;
        self.state.lock().inputs.push(input);
        Ok(())
    }

    fn add_output(&self, output: HandleId, kind: StreamKind) -> Result<(), CameraError> {
        let operation = match kind {
            StreamKind::Preview => Operation::AddPreviewOutput,
            StreamKind::Video => Operation::AddVideoOutput,
        };
        self.shared.step(operation)?;
        self.require_configuring()?;
        self.state.lock().outputs.push((output, kind));
        Ok(())
    }

    async fn commit_config(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::CommitConfig).await?;
        let mut state = self.state.lock();
        if !state.configuring {
            return Err(Self::driver_error("config not begun"));
        }
        if state.inputs.is_empty() || state.outputs.is_empty() {
            return Err(Self::driver_error("session needs an input and an output"));
        }
        state.configuring = false;
        state.committed = true;
        Ok(())
    }

    async fn start(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::StartSession).await?;
        self.require_committed()
    }

    async fn stop(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::StopSession).await
    }

    async fn release(&self) -> Result<(), CameraError> {
        self.shared.step_async(Operation::ReleaseSession).await?;
        let mut state = self.state.lock();
        state.inputs.clear();
        state.outputs.clear();
        state.committed = false;
        Ok(())
    }

    fn is_stabilization_supported(&self, mode: StabilizationMode) -> Result<bool, CameraError> {
        self.require_committed()?;
        Ok(self.shared.stabilization_modes.contains(&mode))
    }

    fn set_stabilization_mode(&self, mode: StabilizationMode) -> Result<(), CameraError> {
        self.shared.step(Operation::SetStabilization)?;
        if !self.shared.stabilization_modes.contains(&mode) {
            return Err(CameraError::Unsupported(format!("stabilization {}", mode)));
        }
        self.state.lock().stabilization = mode;
        Ok(())
    }

    fn active_stabilization_mode(&self) -> Result<StabilizationMode, CameraError> {
        Ok(self.state.lock().stabilization)
    }

    fn supported_color_spaces(&self) -> Result<Vec<ColorSpace>, CameraError> {
        self.require_committed()?;
        Ok(self.shared.color_spaces.clone())
    }

    fn set_color_space(&self, color_space: ColorSpace) -> Result<(), CameraError> {
        self.shared.step(Operation::SetColorSpace)?;
        if !self.shared.color_spaces.contains(&color_space) {
            return Err(CameraError::Unsupported(format!("color space {}", color_space)));
        }
        self.state.lock().color_space = color_space;
        Ok(())
    }

    fn active_color_space(&self) -> Result<ColorSpace, CameraError> {
        Ok(self.state.lock().color_space)
    }

    fn set_zoom_ratio(&self, ratio: f64) -> Result<(), CameraError> {
        self.shared.step(Operation::SetZoomRatio)?;
        self.require_committed()?;
        let snapped = (ratio / ZOOM_STEP).round() * ZOOM_STEP;
        self.state.lock().zoom_ratio = self.shared.zoom_range.clamp(snapped);
        Ok(())
    }

    fn zoom_ratio(&self) -> Result<f64, CameraError> {
        self.shared.step(Operation::GetZoomRatio)?;
        Ok(self.state.lock().zoom_ratio)
    }

    fn zoom_range(&self) -> Result<ZoomRange, CameraError> {
        self.shared.step(Operation::QueryZoomRange)?;
        Ok(self.shared.zoom_range)
    }
}

/// Output files that exist only in the journal
pub struct SimulatedOutputs {
    shared: Arc<Shared>,
}

#[async_trait]
impl OutputFiles for SimulatedOutputs {
    async fn open(&self, target: &OutputTarget) -> Result<Box<dyn OutputFile>, OutputError> {
        self.shared
            .step(Operation::OpenOutputFile)
            .map_err(|e| OutputError::Open {
                path: target.path.clone(),
                message: e.to_string(),
            })?;
        Ok(Box::new(SimulatedFile {
            path: target.path.clone(),
            shared: Arc::clone(&self.shared),
            closed: AtomicBool::new(false),
        }))
    }
}

struct SimulatedFile {
    path: PathBuf,
    shared: Arc<Shared>,
    closed: AtomicBool,
}

#[async_trait]
impl OutputFile for SimulatedFile {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn close(&self) -> Result<(), OutputError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.shared
            .step_async(Operation::CloseOutputFile)
            .await
            .map_err(|e| OutputError::Close {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }
}
