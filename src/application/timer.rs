//! Recording duration timer

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::domain::recording::RecordingClock;

/// Tick period of the recording clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic recording clock.
///
/// Publishes the elapsed time through a watch channel so the presenter can
/// redraw on every tick. Must be started from within a tokio runtime.
pub struct RecordingTimer {
    clock: Arc<watch::Sender<RecordingClock>>,
    ticker: Option<JoinHandle<()>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        let (clock, _) = watch::channel(RecordingClock::new());
        Self {
            clock: Arc::new(clock),
            ticker: None,
        }
    }

    /// Start ticking from zero. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.clock.send_replace(RecordingClock::new());
        let clock = Arc::clone(&self.clock);
        let mut ticks = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);

        self.ticker = Some(tokio::spawn(async move {
            loop {
                ticks.tick().await;
                clock.send_modify(|c| {
                    c.tick();
                });
            }
        }));
        true
    }

    /// Cancel ticking and reset to zero. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(ticker) = self.ticker.take() else {
            return false;
        };
        ticker.abort();
        self.clock.send_replace(RecordingClock::new());
        true
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn elapsed(&self) -> RecordingClock {
        *self.clock.borrow()
    }

    /// `mm:ss`, or `hh:mm:ss` past the first hour
    pub fn elapsed_text(&self) -> String {
        self.elapsed().to_string()
    }

    /// Watch every tick
    pub fn subscribe(&self) -> watch::Receiver<RecordingClock> {
        self.clock.subscribe()
    }
}

impl Default for RecordingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RecordingTimer {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
