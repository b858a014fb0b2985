//! Pinch zoom controller

use std::sync::{Arc, Weak};

use tracing::debug;

use crate::domain::session::Operation;
use crate::domain::zoom::{ZoomRange, ZoomState};

use super::lifecycle::SessionError;

/// Zoom capability of a running session
pub trait ZoomControl: Send + Sync {
    fn set_zoom_ratio(&self, ratio: f64) -> Result<(), SessionError>;

    /// Ratio currently applied by the hardware
    fn zoom_ratio(&self) -> Result<f64, SessionError>;

    fn zoom_range(&self) -> Result<ZoomRange, SessionError>;
}

struct Attached<Z> {
    target: Weak<Z>,
    state: ZoomState,
}

/// Maps pinch gestures onto a session's zoom ratio.
///
/// Holds only a weak reference to the session, so a released session is
/// never kept alive by zoom and gestures against it become no-ops.
pub struct ZoomController<Z: ZoomControl> {
    attached: Option<Attached<Z>>,
}

impl<Z: ZoomControl> ZoomController<Z> {
    pub fn new() -> Self {
        Self { attached: None }
    }

    /// Bind to a running session, reading its range and current ratio.
    /// A range with non-finite or crossed bounds leaves zoom detached.
    pub fn attach(&mut self, target: &Arc<Z>) -> Result<ZoomRange, SessionError> {
        self.attached = None;
        let range = target.zoom_range()?;
        if !range.is_valid() {
            return Err(SessionError::Hardware {
                operation: Operation::QueryZoomRange,
                reason: format!("unusable zoom range {}", range),
            });
        }
        let ratio = target.zoom_ratio()?;
        self.attached = Some(Attached {
            target: Arc::downgrade(target),
            state: ZoomState::new(ratio, range),
        });
        debug!(%range, ratio, "Zoom attached");
        Ok(range)
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Committed baseline and range, if attached
    pub fn state(&self) -> Option<ZoomState> {
        self.attached.as_ref().map(|a| a.state)
    }

    /// Scale the committed ratio, clamp it, and apply it.
    /// Returns the applied ratio, or `None` when nothing was sent.
    pub fn on_gesture_update(&self, scale: f64) -> Option<f64> {
        let attached = self.attached.as_ref()?;
        let target = attached.target.upgrade()?;
        let ratio = attached.state.propose(scale)?;

        match target.set_zoom_ratio(ratio) {
            Ok(()) => Some(ratio),
            Err(e) => {
                debug!(error = %e, "Zoom update dropped");
                None
            }
        }
    }

    /// Read back the hardware ratio and make it the new baseline
    pub fn on_gesture_end(&mut self) -> Option<f64> {
        let attached = self.attached.as_mut()?;
        let target = attached.target.upgrade()?;

        match target.zoom_ratio() {
            Ok(ratio) => {
                attached.state.commit(ratio);
                Some(attached.state.ratio())
            }
            Err(e) => {
                debug!(error = %e, "Zoom baseline not refreshed");
                None
            }
        }
    }
}

impl<Z: ZoomControl> Default for ZoomController<Z> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{InvalidStateTransition, LifecycleState};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Session stand-in that rounds to two decimals like real hardware
    struct MockZoom {
        running: AtomicBool,
        range: ZoomRange,
        ratio: Mutex<f64>,
        sent: Mutex<Vec<f64>>,
    }

    impl MockZoom {
        fn running() -> Arc<Self> {
            Self::with_range(ZoomRange::new(1.0, 10.0))
        }

        fn with_range(range: ZoomRange) -> Arc<Self> {
            Arc::new(Self {
                running: AtomicBool::new(true),
                range,
                ratio: Mutex::new(1.0),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn check(&self, action: &str) -> Result<(), SessionError> {
            if self.running.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(InvalidStateTransition::new(LifecycleState::Released, action).into())
            }
        }
    }

    impl ZoomControl for MockZoom {
        fn set_zoom_ratio(&self, ratio: f64) -> Result<(), SessionError> {
            self.check("set zoom ratio")?;
            self.sent.lock().push(ratio);
            *self.ratio.lock() = (ratio * 100.0).round() / 100.0;
            Ok(())
        }

        fn zoom_ratio(&self) -> Result<f64, SessionError> {
            self.check("get zoom ratio")?;
            Ok(*self.ratio.lock())
        }

        fn zoom_range(&self) -> Result<ZoomRange, SessionError> {
            self.check("query zoom range")?;
            Ok(self.range)
        }
    }

    #[test]
    fn detached_controller_ignores_gestures() {
        let mut zoom: ZoomController<MockZoom> = ZoomController::new();
        assert_eq!(zoom.on_gesture_update(2.0), None);
        assert_eq!(zoom.on_gesture_end(), None);
    }

    #[test]
    fn updates_scale_the_committed_baseline() {
        let session = MockZoom::running();
        let mut zoom = ZoomController::new();
        zoom.attach(&session).unwrap();

        assert_eq!(zoom.on_gesture_update(1.5), Some(1.5));
        assert_eq!(zoom.on_gesture_update(2.0), Some(2.0));
        assert_eq!(zoom.on_gesture_end(), Some(2.0));

        assert_eq!(zoom.on_gesture_update(1.5), Some(3.0));
    }

    #[test]
    fn ratio_is_clamped_before_hardware_call() {
        let session = MockZoom::running();
        let mut zoom = ZoomController::new();
        zoom.attach(&session).unwrap();

        assert_eq!(zoom.on_gesture_update(40.0), Some(10.0));
        assert_eq!(zoom.on_gesture_update(0.05), Some(1.0));
        assert_eq!(*session.sent.lock(), vec![10.0, 1.0]);
    }

    #[test]
    fn gesture_end_adopts_hardware_rounding() {
        let session = MockZoom::running();
        let mut zoom = ZoomController::new();
        zoom.attach(&session).unwrap();

        zoom.on_gesture_update(1.2345);
        assert_eq!(zoom.on_gesture_end(), Some(1.23));
        assert_eq!(zoom.state().unwrap().ratio(), 1.23);
    }

    #[test]
    fn stopped_session_turns_gestures_into_noops() {
        let session = MockZoom::running();
        let mut zoom = ZoomController::new();
        zoom.attach(&session).unwrap();

        session.running.store(false, Ordering::SeqCst);
        assert_eq!(zoom.on_gesture_update(2.0), None);
        assert_eq!(zoom.on_gesture_end(), None);
        assert!(session.sent.lock().is_empty());
    }

    #[test]
    fn dropped_session_is_not_kept_alive() {
        let session = MockZoom::running();
        let mut zoom = ZoomController::new();
        zoom.attach(&session).unwrap();

        drop(session);
        assert_eq!(zoom.on_gesture_update(2.0), None);
        zoom.detach();
        assert!(!zoom.is_attached());
    }

    #[test]
    fn unusable_range_is_rejected_on_attach() {
        let session = MockZoom::with_range(ZoomRange {
            min: f64::NAN,
            max: 10.0,
        });
        let mut zoom = ZoomController::new();

        let err = zoom.attach(&session).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Hardware {
                operation: Operation::QueryZoomRange,
                ..
            }
        ));
        assert!(!zoom.is_attached());
        assert_eq!(zoom.on_gesture_update(2.0), None);
    }
}
