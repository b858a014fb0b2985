//! Session lifecycle controller
//!
//! Drives one capture session from idle through running to released,
//! acquiring hardware handles in a fixed order and tearing them down in
//! reverse. Every state-changing hardware call happens under the session
//! lock, so configure and release calls never interleave.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::domain::camera::{
    negotiate, CameraDevice, ColorSpace, NegotiatedProfiles, ProfileNotFound, SceneMode,
    StabilizationMode, StreamKind,
};
use crate::domain::error::RequestError;
use crate::domain::recording::RecordingRequest;
use crate::domain::session::{InvalidStateTransition, LifecycleState, Operation, SessionLifecycle};
use crate::domain::zoom::ZoomRange;

use super::ports::{
    CameraError, CameraInput, CameraManager, OutputFile, OutputFiles, PreviewOutput, VideoOutput,
    VideoSession,
};
use super::zoom::ZoomControl;

/// Errors from the session lifecycle
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Camera unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    #[error(transparent)]
    ProfileNotFound(#[from] ProfileNotFound),

    #[error("Camera operation '{operation}' failed: {reason}")]
    Hardware { operation: Operation, reason: String },

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Invalid recording request: {0}")]
    InvalidRequest(#[from] RequestError),
}

impl SessionError {
    fn hardware(operation: Operation, err: impl fmt::Display) -> Self {
        Self::Hardware {
            operation,
            reason: err.to_string(),
        }
    }

    /// Single human-readable line for the user
    pub fn user_message(&self) -> String {
        match self {
            Self::DeviceUnavailable { reason } => format!("No usable camera: {}", reason),
            Self::ProfileNotFound(missing) => format!(
                "This camera cannot record {} at {} fps in {}. Settings were reset to defaults.",
                missing.size,
                missing.frame_rate,
                if missing.hdr { "HDR" } else { "SDR" }
            ),
            Self::Hardware { operation, .. } => format!(
                "Camera setup failed ({}). Settings were reset to defaults.",
                operation
            ),
            Self::InvalidState(err) => err.to_string(),
            Self::InvalidRequest(err) => err.to_string(),
        }
    }
}

/// A teardown step that failed without stopping the rest of the teardown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseWarning {
    pub operation: Operation,
    pub reason: String,
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.reason)
    }
}

/// What a teardown did, step by step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Steps attempted, in order
    pub performed: Vec<Operation>,
    /// Steps that failed
    pub warnings: Vec<ReleaseWarning>,
}

impl TeardownReport {
    /// No step failed
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Nothing was left to release
    pub fn is_noop(&self) -> bool {
        self.performed.is_empty()
    }

    fn record<E: fmt::Display>(&mut self, operation: Operation, result: Result<(), E>) {
        self.performed.push(operation);
        if let Err(e) = result {
            self.warnings.push(ReleaseWarning {
                operation,
                reason: e.to_string(),
            });
        }
    }
}

/// Per-session behaviour switches
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Enable auto stabilization when the session supports it
    pub stabilization: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            stabilization: true,
        }
    }
}

/// Hardware handles owned by one capture session.
/// `None` means never acquired or already released.
#[derive(Default)]
struct CaptureHandles {
    output_file: Option<Box<dyn OutputFile>>,
    input: Option<Box<dyn CameraInput>>,
    preview: Option<Box<dyn PreviewOutput>>,
    video: Option<Box<dyn VideoOutput>>,
    video_started: bool,
    session: Option<Arc<dyn VideoSession>>,
    session_started: bool,
}

struct CaptureSession {
    lifecycle: SessionLifecycle,
    handles: CaptureHandles,
    profiles: Option<NegotiatedProfiles>,
    last_teardown: Option<TeardownReport>,
}

/// Lifecycle controller for a single capture session.
///
/// One controller records once; start a fresh controller for the next
/// recording.
pub struct SessionController<M, F>
where
    M: CameraManager,
    F: OutputFiles,
{
    camera: Arc<M>,
    outputs: Arc<F>,
    options: SessionOptions,
    session: Mutex<CaptureSession>,
    /// Session handle reachable by zoom calls, present only while running
    live_session: RwLock<Option<Arc<dyn VideoSession>>>,
    state_tx: watch::Sender<LifecycleState>,
}

impl<M, F> SessionController<M, F>
where
    M: CameraManager,
    F: OutputFiles,
{
    /// Create a controller in idle state
    pub fn new(camera: Arc<M>, outputs: Arc<F>, options: SessionOptions) -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Idle);
        Self {
            camera,
            outputs,
            options,
            session: Mutex::new(CaptureSession {
                lifecycle: SessionLifecycle::new(),
                handles: CaptureHandles::default(),
                profiles: None,
                last_teardown: None,
            }),
            live_session: RwLock::new(None),
            state_tx,
        }
    }

    /// Current lifecycle state, readable without waiting on the session lock
    pub fn current_state(&self) -> LifecycleState {
        *self.state_tx.borrow()
    }

    /// Watch lifecycle state changes
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Profiles negotiated for this session, once past opening
    pub async fn profiles(&self) -> Option<NegotiatedProfiles> {
        self.session.lock().await.profiles
    }

    /// Report of the teardown that released this session, if any
    pub async fn last_teardown(&self) -> Option<TeardownReport> {
        self.session.lock().await.last_teardown.clone()
    }

    /// Open, configure and start the session.
    ///
    /// Opening failures return to idle with nothing acquired. Later
    /// failures release whatever was created and leave the session released.
    pub async fn start(&self, request: &RecordingRequest) -> Result<NegotiatedProfiles, SessionError> {
        request.validate()?;

        let mut session = self.session.lock().await;
        session.lifecycle.begin_opening()?;
        self.publish(session.lifecycle.state());
        info!(%request, "Opening camera");

        let (device, profiles) = match self.open(request).await {
            Ok(opened) => opened,
            Err(err) => {
                session.lifecycle.abort_opening()?;
                self.publish(session.lifecycle.state());
                warn!(error = %err, "Camera open failed, session back to idle");
                return Err(err);
            }
        };

        session.lifecycle.begin_configuring()?;
        session.profiles = Some(profiles);
        self.publish(session.lifecycle.state());
        debug!(preview = %profiles.preview.size, video = %profiles.video, "Negotiated profiles");

        let configured = self
            .configure(&mut session.handles, &device, request, &profiles)
            .await;
        let launched = match configured {
            Ok(()) => self.launch(&mut session.handles, request.hdr).await,
            Err(err) => Err(err),
        };
        if let Err(err) = launched {
            warn!(error = %err, "Session setup failed, rolling back");
            self.tear_down(&mut session).await?;
            return Err(err);
        }

        session.lifecycle.mark_running()?;
        *self.live_session.write() = session.handles.session.clone();
        self.publish(session.lifecycle.state());
        info!(device = %device, "Recording session running");

        Ok(profiles)
    }

    /// Stop and release the session.
    ///
    /// Stopping an already released session is a no-op returning an empty
    /// report. Stopping a session that never left idle is an error.
    pub async fn stop(&self) -> Result<TeardownReport, SessionError> {
        let mut session = self.session.lock().await;
        match session.lifecycle.state() {
            LifecycleState::Idle => {
                return Err(InvalidStateTransition::new(LifecycleState::Idle, "stop session").into());
            }
            LifecycleState::Released => {
                debug!("Stop requested on released session, ignoring");
                return Ok(TeardownReport::default());
            }
            _ => {}
        }
        self.tear_down(&mut session).await
    }

    /// Find a device that can record video and negotiate its profiles
    async fn open(
        &self,
        request: &RecordingRequest,
    ) -> Result<(CameraDevice, NegotiatedProfiles), SessionError> {
        let devices = self
            .camera
            .enumerate_devices()
            .await
            .map_err(|e| SessionError::DeviceUnavailable {
                reason: e.to_string(),
            })?;

        let device = devices
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::DeviceUnavailable {
                reason: "no camera devices found".to_string(),
            })?;

        if !self
            .camera
            .supported_scene_modes(&device)
            .contains(&SceneMode::NormalVideo)
        {
            return Err(SessionError::DeviceUnavailable {
                reason: format!("{} does not support {}", device, SceneMode::NormalVideo),
            });
        }

        let capability = self
            .camera
            .output_capability(&device, SceneMode::NormalVideo)
            .map_err(|e| SessionError::hardware(Operation::QueryCapability, e))?;

        let profiles = negotiate(&capability, request)?;
        Ok((device, profiles))
    }

    /// Acquire every handle and commit the session configuration
    async fn configure(
        &self,
        handles: &mut CaptureHandles,
        device: &CameraDevice,
        request: &RecordingRequest,
        profiles: &NegotiatedProfiles,
    ) -> Result<(), SessionError> {
        let file = self
            .outputs
            .open(&request.target)
            .await
            .map_err(|e| SessionError::hardware(Operation::OpenOutputFile, e))?;
        handles.output_file = Some(file);

        let input = self
            .camera
            .create_input(device)
            .map_err(|e| SessionError::hardware(Operation::CreateInput, e))?;
        let input = handles.input.insert(input);
        let input_id = input.handle();
        input
            .open()
            .await
            .map_err(|e| SessionError::hardware(Operation::OpenInput, e))?;

        let preview = self
            .camera
            .create_preview_output(&profiles.preview, &request.target.preview_surface)
            .map_err(|e| SessionError::hardware(Operation::CreatePreviewOutput, e))?;
        let preview_id = handles.preview.insert(preview).handle();

        let video = self
            .camera
            .create_video_output(&profiles.video, &request.target.encoder_surface)
            .map_err(|e| SessionError::hardware(Operation::CreateVideoOutput, e))?;
        let video_id = handles.video.insert(video).handle();

        let session: Arc<dyn VideoSession> = self
            .camera
            .create_session(SceneMode::NormalVideo)
            .map_err(|e| SessionError::hardware(Operation::CreateSession, e))?
            .into();
        handles.session = Some(Arc::clone(&session));

        session
            .begin_config()
            .map_err(|e| SessionError::hardware(Operation::BeginConfig, e))?;
        session
            .add_input(input_id)
            .map_err(|e| SessionError::hardware(Operation::AddInput, e))?;
        session
            .add_output(preview_id, StreamKind::Preview)
            .map_err(|e| SessionError::hardware(Operation::AddPreviewOutput, e))?;
        session
            .add_output(video_id, StreamKind::Video)
            .map_err(|e| SessionError::hardware(Operation::AddVideoOutput, e))?;
        session
            .commit_config()
            .await
            .map_err(|e| SessionError::hardware(Operation::CommitConfig, e))?;

        Ok(())
    }

    /// Tune the committed session, then start it and the encoder stream
    async fn launch(&self, handles: &mut CaptureHandles, hdr: bool) -> Result<(), SessionError> {
        let session = handles
            .session
            .clone()
            .ok_or_else(|| SessionError::hardware(Operation::StartSession, "no session handle"))?;

        if self.options.stabilization {
            apply_stabilization(session.as_ref());
        }
        apply_color_space(session.as_ref(), ColorSpace::for_recording(hdr));

        session
            .start()
            .await
            .map_err(|e| SessionError::hardware(Operation::StartSession, e))?;
        handles.session_started = true;

        let video = handles
            .video
            .as_deref()
            .ok_or_else(|| SessionError::hardware(Operation::StartVideoOutput, "no video output"))?;
        video
            .start()
            .await
            .map_err(|e| SessionError::hardware(Operation::StartVideoOutput, e))?;
        handles.video_started = true;

        Ok(())
    }

    /// Move to stopping, release every remaining handle, then mark released.
    /// Resumes a teardown that was interrupted while stopping.
    async fn tear_down(&self, session: &mut CaptureSession) -> Result<TeardownReport, SessionError> {
        self.live_session.write().take();

        if session.lifecycle.state() != LifecycleState::Stopping {
            session.lifecycle.begin_stopping()?;
            self.publish(session.lifecycle.state());
        }
        info!("Releasing capture session");

        let report = release_handles(&mut session.handles).await;

        session.lifecycle.mark_released()?;
        self.publish(session.lifecycle.state());

        for warning in &report.warnings {
            warn!(operation = %warning.operation, reason = %warning.reason, "Release step failed");
        }
        info!(
            steps = report.performed.len(),
            warnings = report.warnings.len(),
            "Capture session released"
        );

        session.last_teardown = Some(report.clone());
        Ok(report)
    }

    fn publish(&self, state: LifecycleState) {
        self.state_tx.send_replace(state);
        debug!(%state, "Lifecycle state changed");
    }

    fn with_live_session<R>(
        &self,
        operation: Operation,
        call: impl FnOnce(&dyn VideoSession) -> Result<R, CameraError>,
    ) -> Result<R, SessionError> {
        let live = self.live_session.read();
        let session = live
            .as_ref()
            .ok_or_else(|| InvalidStateTransition::new(self.current_state(), operation.as_str()))?;
        call(session.as_ref()).map_err(|e| SessionError::hardware(operation, e))
    }
}

impl<M, F> ZoomControl for SessionController<M, F>
where
    M: CameraManager,
    F: OutputFiles,
{
    fn set_zoom_ratio(&self, ratio: f64) -> Result<(), SessionError> {
        self.with_live_session(Operation::SetZoomRatio, |session| {
            session.set_zoom_ratio(ratio)
        })
    }

    fn zoom_ratio(&self) -> Result<f64, SessionError> {
        self.with_live_session(Operation::GetZoomRatio, |session| session.zoom_ratio())
    }

    fn zoom_range(&self) -> Result<ZoomRange, SessionError> {
        self.with_live_session(Operation::QueryZoomRange, |session| session.zoom_range())
    }
}

/// Enable auto stabilization if supported. Failures only degrade the recording.
fn apply_stabilization(session: &dyn VideoSession) {
    let mode = StabilizationMode::Auto;
    match session.is_stabilization_supported(mode) {
        Ok(true) => {}
        Ok(false) => {
            debug!(%mode, "Stabilization mode unsupported, recording without it");
            return;
        }
        Err(e) => {
            warn!(operation = %Operation::SetStabilization, error = %e, "Stabilization query failed");
            return;
        }
    }

    if let Err(e) = session.set_stabilization_mode(mode) {
        warn!(operation = %Operation::SetStabilization, error = %e, "Stabilization not applied");
        return;
    }
    match session.active_stabilization_mode() {
        Ok(active) => debug!(%active, "Stabilization active"),
        Err(e) => debug!(error = %e, "Could not read back stabilization mode"),
    }
}

/// Apply the recording color space if supported. Failures keep the driver default.
fn apply_color_space(session: &dyn VideoSession, wanted: ColorSpace) {
    match session.supported_color_spaces() {
        Ok(spaces) if spaces.contains(&wanted) => {}
        Ok(_) => {
            warn!(color_space = %wanted, "Color space unsupported, keeping driver default");
            return;
        }
        Err(e) => {
            warn!(operation = %Operation::SetColorSpace, error = %e, "Color space query failed");
            return;
        }
    }

    if let Err(e) = session.set_color_space(wanted) {
        warn!(operation = %Operation::SetColorSpace, error = %e, "Color space not applied");
        return;
    }
    match session.active_color_space() {
        Ok(active) => debug!(%active, "Color space active"),
        Err(e) => debug!(error = %e, "Could not read back color space"),
    }
}

/// Best-effort release in fixed order. Each step runs regardless of
/// earlier failures; every handle is taken so it is released at most once.
async fn release_handles(handles: &mut CaptureHandles) -> TeardownReport {
    let mut report = TeardownReport::default();

    if std::mem::take(&mut handles.video_started) {
        if let Some(video) = handles.video.as_deref() {
            report.record(Operation::StopVideoOutput, video.stop().await);
        }
    }
    if std::mem::take(&mut handles.session_started) {
        if let Some(session) = handles.session.as_deref() {
            report.record(Operation::StopSession, session.stop().await);
        }
    }
    if let Some(file) = handles.output_file.take() {
        report.record(Operation::CloseOutputFile, file.close().await);
    }
    if let Some(input) = handles.input.take() {
        report.record(Operation::CloseInput, input.close().await);
    }
    if let Some(preview) = handles.preview.take() {
        report.record(Operation::ReleasePreviewOutput, preview.release().await);
    }
    if let Some(video) = handles.video.take() {
        report.record(Operation::ReleaseVideoOutput, video.release().await);
    }
    if let Some(session) = handles.session.take() {
        report.record(Operation::ReleaseSession, session.release().await);
    }

    report
}
