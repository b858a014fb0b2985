//! Session facade
//!
//! Entry point for the UI layer: one active capture session at a time,
//! with the recording timer and zoom controller bound to it while it runs.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{error, info, warn};

use crate::domain::camera::NegotiatedProfiles;
use crate::domain::recording::{RecordingClock, RecordingRequest};
use crate::domain::session::{InvalidStateTransition, LifecycleState};
use crate::domain::zoom::ZoomRange;

use super::lifecycle::{SessionController, SessionError, SessionOptions, TeardownReport};
use super::ports::{CameraManager, NotificationIcon, Notifier, OutputFiles};
use super::timer::RecordingTimer;
use super::zoom::{ZoomControl, ZoomController};

const APP_NAME: &str = "Camcorder";

/// Configuration for the facade
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Enable auto stabilization when supported
    pub stabilization: bool,
    /// Whether to show notifications
    pub enable_notify: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            stabilization: true,
            enable_notify: false,
        }
    }
}

type Controller<M, F> = SessionController<M, F>;

/// Recording facade composing lifecycle, timer and zoom
pub struct SessionFacade<M, F, N>
where
    M: CameraManager,
    F: OutputFiles,
    N: Notifier,
{
    camera: Arc<M>,
    outputs: Arc<F>,
    notifier: N,
    config: FacadeConfig,
    /// Serializes start and stop
    op_lock: AsyncMutex<()>,
    active: RwLock<Option<Arc<Controller<M, F>>>>,
    timer: Mutex<RecordingTimer>,
    zoom: Mutex<ZoomController<Controller<M, F>>>,
    capture_config: Mutex<Option<RecordingRequest>>,
}

impl<M, F, N> SessionFacade<M, F, N>
where
    M: CameraManager,
    F: OutputFiles,
    N: Notifier,
{
    pub fn new(camera: Arc<M>, outputs: Arc<F>, notifier: N, config: FacadeConfig) -> Self {
        Self {
            camera,
            outputs,
            notifier,
            config,
            op_lock: AsyncMutex::new(()),
            active: RwLock::new(None),
            timer: Mutex::new(RecordingTimer::new()),
            zoom: Mutex::new(ZoomController::new()),
            capture_config: Mutex::new(None),
        }
    }

    /// Start a new recording, releasing any previous session first.
    ///
    /// On failure the capture configuration is reset to defaults and the
    /// user is told why.
    pub async fn start_recording(
        &self,
        request: RecordingRequest,
    ) -> Result<NegotiatedProfiles, SessionError> {
        let _op = self.op_lock.lock().await;
        request.validate()?;
        *self.capture_config.lock() = Some(request.clone());

        if let Some(report) = self.release_active().await {
            info!(warnings = report.warnings.len(), "Released previous session");
        }

        let controller = Arc::new(SessionController::new(
            Arc::clone(&self.camera),
            Arc::clone(&self.outputs),
            SessionOptions {
                stabilization: self.config.stabilization,
            },
        ));
        *self.active.write() = Some(Arc::clone(&controller));

        match controller.start(&request).await {
            Ok(profiles) => {
                self.timer.lock().start();
                let attached = self.zoom.lock().attach(&controller);
                if let Err(e) = attached {
                    warn!(error = %e, "Zoom unavailable for this session");
                }
                info!(%request, "Recording started");
                self.notify(
                    "Recording",
                    &format!("Recording {}", request),
                    NotificationIcon::Recording,
                )
                .await;
                Ok(profiles)
            }
            Err(err) => {
                error!(error = %err, "Failed to start recording");
                *self.capture_config.lock() =
                    Some(RecordingRequest::defaults(request.target.clone()));
                self.notify("Recording failed", &err.user_message(), NotificationIcon::Error)
                    .await;
                Err(err)
            }
        }
    }

    /// Stop the timer, then stop and release the active session.
    /// Repeated calls return an empty report.
    pub async fn stop_recording(&self) -> Result<TeardownReport, SessionError> {
        let _op = self.op_lock.lock().await;
        let controller = self
            .active
            .read()
            .clone()
            .ok_or_else(|| InvalidStateTransition::new(LifecycleState::Idle, "stop recording"))?;

        self.timer.lock().stop();
        self.zoom.lock().detach();

        let report = controller.stop().await?;
        if !report.is_noop() {
            info!(warnings = report.warnings.len(), "Recording stopped");
            self.notify("Recording saved", "Recording stopped", NotificationIcon::Saved)
                .await;
        }
        Ok(report)
    }

    /// Feed a pinch scale factor. Returns the ratio applied, if any.
    pub fn on_zoom_gesture(&self, scale: f64) -> Option<f64> {
        self.zoom.lock().on_gesture_update(scale)
    }

    /// End of pinch: adopt the hardware's ratio as the new baseline
    pub fn on_zoom_gesture_end(&self) -> Option<f64> {
        self.zoom.lock().on_gesture_end()
    }

    pub fn elapsed_time_text(&self) -> String {
        self.timer.lock().elapsed_text()
    }

    /// Watch the recording clock
    pub fn subscribe_elapsed(&self) -> watch::Receiver<RecordingClock> {
        self.timer.lock().subscribe()
    }

    /// State of the active session, idle when there is none
    pub fn current_state(&self) -> LifecycleState {
        self.active
            .read()
            .as_ref()
            .map_or(LifecycleState::Idle, |c| c.current_state())
    }

    /// The request to use for the next recording.
    /// Reset to defaults after a failed start.
    pub fn capture_config(&self) -> Option<RecordingRequest> {
        self.capture_config.lock().clone()
    }

    /// Teardown report of the active session, if it has been released
    pub async fn last_teardown(&self) -> Option<TeardownReport> {
        let controller = self.active.read().clone()?;
        controller.last_teardown().await
    }

    async fn release_active(&self) -> Option<TeardownReport> {
        self.timer.lock().stop();
        self.zoom.lock().detach();

        let previous = self.active.write().take()?;
        match previous.current_state() {
            LifecycleState::Idle | LifecycleState::Released => None,
            _ => match previous.stop().await {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(error = %e, "Failed to release previous session");
                    None
                }
            },
        }
    }

    async fn notify(&self, title: &str, message: &str, icon: NotificationIcon) {
        if !self.config.enable_notify {
            return;
        }
        let title = format!("{}: {}", APP_NAME, title);
        if let Err(e) = self.notifier.notify(&title, message, icon).await {
            warn!(error = %e, "Notification failed");
        }
    }

    fn active_controller(&self, action: &str) -> Result<Arc<Controller<M, F>>, SessionError> {
        self.active
            .read()
            .clone()
            .ok_or_else(|| InvalidStateTransition::new(LifecycleState::Idle, action).into())
    }
}

impl<M, F, N> ZoomControl for SessionFacade<M, F, N>
where
    M: CameraManager,
    F: OutputFiles,
    N: Notifier,
{
    fn set_zoom_ratio(&self, ratio: f64) -> Result<(), SessionError> {
        self.active_controller("set zoom ratio")?.set_zoom_ratio(ratio)
    }

    fn zoom_ratio(&self) -> Result<f64, SessionError> {
        self.active_controller("get zoom ratio")?.zoom_ratio()
    }

    fn zoom_range(&self) -> Result<ZoomRange, SessionError> {
        self.active_controller("query zoom range")?.zoom_range()
    }
}
