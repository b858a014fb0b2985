//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{Resolution, VideoCodec, DEFAULT_FRAME_RATE};

/// Log level used when neither RUST_LOG nor the config sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub resolution: Option<String>,
    pub frame_rate: Option<u32>,
    pub hdr: Option<bool>,
    pub codec: Option<String>,
    pub stabilization: Option<bool>,
    pub output_dir: Option<String>,
    pub notify: Option<bool>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            resolution: Some(Resolution::default().to_string()),
            frame_rate: Some(DEFAULT_FRAME_RATE),
            hdr: Some(false),
            codec: Some(VideoCodec::default().to_string()),
            stabilization: Some(true),
            output_dir: None,
            notify: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            resolution: other.resolution.or(self.resolution),
            frame_rate: other.frame_rate.or(self.frame_rate),
            hdr: other.hdr.or(self.hdr),
            codec: other.codec.or(self.codec),
            stabilization: other.stabilization.or(self.stabilization),
            output_dir: other.output_dir.or(self.output_dir),
            notify: other.notify.or(self.notify),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get resolution as parsed preset, or 1080p if not set/invalid
    pub fn resolution_or_default(&self) -> Resolution {
        self.resolution
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get frame rate, or 30 fps if not set or zero
    pub fn frame_rate_or_default(&self) -> u32 {
        self.frame_rate
            .filter(|fps| *fps > 0)
            .unwrap_or(DEFAULT_FRAME_RATE)
    }

    pub fn hdr_or_default(&self) -> bool {
        self.hdr.unwrap_or(false)
    }

    /// Get codec as parsed value, or AVC if not set/invalid
    pub fn codec_or_default(&self) -> VideoCodec {
        self.codec
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get stabilization setting, or true if not set
    pub fn stabilization_or_default(&self) -> bool {
        self.stabilization.unwrap_or(true)
    }

    /// Configured output directory, if any
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get log level, or "info" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
