//! Notifier that writes to the tracing log

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// Notifier for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        match icon {
            NotificationIcon::Error => error!(title, message, "Notification"),
            NotificationIcon::Warning => warn!(title, message, "Notification"),
            _ => info!(title, message, "Notification"),
        }
        Ok(())
    }
}
