//! CLI presenter for output formatting

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::recording::{RecordingClock, RecordingLimit};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.red} {msg}") {
            spinner.set_style(style.tick_chars("●○ "));
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(500));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Status line shown while recording, e.g. `REC 00:05 / 30s  zoom 2.00x`
    pub fn format_recording(
        &self,
        clock: RecordingClock,
        limit: Option<RecordingLimit>,
        zoom: Option<f64>,
    ) -> String {
        let mut line = format!("{} {}", "REC".red().bold(), clock);
        if let Some(limit) = limit {
            line.push_str(&format!(" / {}", limit));
        }
        if let Some(ratio) = zoom {
            line.push_str(&format!("  zoom {:.2}x", ratio));
        }
        line
    }

    /// Update the recording status line
    pub fn update_recording(
        &self,
        clock: RecordingClock,
        limit: Option<RecordingLimit>,
        zoom: Option<f64>,
    ) {
        self.update_spinner(&self.format_recording(clock, limit, zoom));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(secs: u64) -> RecordingClock {
        let mut clock = RecordingClock::new();
        for _ in 0..secs {
            clock.tick();
        }
        clock
    }

    #[test]
    fn format_recording_without_limit() {
        colored::control::set_override(false);
        let presenter = Presenter::new();
        let line = presenter.format_recording(clock_at(5), None, None);
        assert_eq!(line, "REC 00:05");
    }

    #[test]
    fn format_recording_with_limit_and_zoom() {
        colored::control::set_override(false);
        let presenter = Presenter::new();
        let limit = RecordingLimit::from_secs(30);
        let line = presenter.format_recording(clock_at(65), limit, Some(2.5));
        assert_eq!(line, "REC 01:05 / 30s  zoom 2.50x");
    }
}
