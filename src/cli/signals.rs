//! Shutdown signal handling for the recording loop

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Set once SIGINT (Ctrl-C) or SIGTERM arrives
#[derive(Clone)]
pub struct ShutdownSignal {
    requested: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        let (requested, _) = watch::channel(false);
        Self {
            requested: Arc::new(requested),
        }
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.requested.borrow()
    }

    /// Request shutdown
    pub fn trigger(&self) {
        self.requested.send_replace(true);
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        let mut rx = self.requested.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|requested| *requested).await;
    }

    /// Listen for OS shutdown signals. Must be called within a tokio runtime.
    pub fn setup(&self) -> Result<(), std::io::Error> {
        let on_interrupt = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received SIGINT (stop)");
                on_interrupt.trigger();
            }
        });

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate())?;
            let on_terminate = self.clone();
            tokio::spawn(async move {
                sigterm.recv().await;
                info!("Received SIGTERM (stop)");
                on_terminate.trigger();
            });
        }

        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn shutdown_signal_default_is_false() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn clones_share_the_flag() {
        let signal = ShutdownSignal::new();
        signal.clone().trigger();
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn wait_resolves_after_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        signal.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn wait_after_trigger_returns_immediately() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.wait().await;
    }
}
