//! Notification infrastructure module
//!
//! Desktop notifications through notify-rust, or log lines for headless runs.

mod log_notifier;
mod notify_rust;

pub use log_notifier::LogNotifier;
pub use notify_rust::NotifyRustNotifier;

use crate::application::ports::Notifier;

/// Create the notifier for this run
///
/// Desktop notifications when requested, otherwise notifications only reach the log.
pub fn create_notifier(desktop: bool) -> Box<dyn Notifier> {
    if desktop {
        Box::new(NotifyRustNotifier::new())
    } else {
        Box::new(LogNotifier)
    }
}
