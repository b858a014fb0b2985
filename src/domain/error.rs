//! Domain error types

use thiserror::Error;

/// Error when parsing a resolution preset
#[derive(Debug, Clone, Error)]
#[error("Invalid resolution: \"{input}\". Valid resolutions are: 4k, 1080p, 720p")]
pub struct InvalidResolutionError {
    pub input: String,
}

/// Error when parsing a video codec name
#[derive(Debug, Clone, Error)]
#[error("Invalid codec: \"{input}\". Valid codecs are: avc, hevc")]
pub struct InvalidCodecError {
    pub input: String,
}

/// Error when parsing a recording limit
#[derive(Debug, Clone, Error)]
#[error("Invalid duration: \"{input}\". Use a format like 30s, 5m, 1h or 1m30s")]
pub struct DurationParseError {
    pub input: String,
}

/// A recording request that can never be satisfied, independent of hardware
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("HDR recording requires the HEVC codec")]
    HdrRequiresHevc,

    #[error("Frame rate must be greater than zero")]
    ZeroFrameRate,

    #[error("Bit rate must be greater than zero")]
    ZeroBitRate,

    #[error("Resolution {width}x{height} is empty")]
    EmptyResolution { width: u32, height: u32 },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
