//! Notification port interface

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("No notification service available: {0}")]
    Unavailable(String),

    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Notification kinds, each with its own icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIcon {
    Info,
    Warning,
    Error,
    Recording,
    Saved,
}

impl NotificationIcon {
    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Warning => "dialog-warning",
            Self::Error => "dialog-error",
            Self::Recording => "camera-video",
            Self::Saved => "video-x-generic",
        }
    }
}

/// Port for user-facing notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a notification.
    ///
    /// Delivery is best effort; callers log and ignore the error.
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError>;
}

/// Blanket implementation for boxed notifier types
#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        self.as_ref().notify(title, message, icon).await
    }
}
