//! Desktop notification adapter using notify-rust

use async_trait::async_trait;

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// Desktop notifier using notify-rust
pub struct NotifyRustNotifier {
    app_name: String,
    /// Milliseconds before the notification expires
    timeout_ms: u32,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self::with_app_name("Camcorder")
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            timeout_ms: 4_000,
        }
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let title = title.to_owned();
        let message = message.to_owned();
        let app_name = self.app_name.clone();
        let icon_name = icon.icon_name();
        let timeout = notify_rust::Timeout::Milliseconds(self.timeout_ms);

        // notify-rust blocks on the session bus
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&message)
                .icon(icon_name)
                .timeout(timeout)
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::Unavailable(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}
