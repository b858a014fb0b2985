//! Recording request value object and its presets

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::camera::Size;
use crate::domain::error::{InvalidCodecError, InvalidResolutionError, RequestError};

/// Default frame rate (frames per second)
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// All available resolution presets
pub const ALL_RESOLUTIONS: &[Resolution] = &[
    Resolution::Uhd4k,
    Resolution::Fhd1080p,
    Resolution::Hd720p,
];

/// Resolution presets offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    Uhd4k,
    #[default]
    Fhd1080p,
    Hd720p,
}

impl Resolution {
    pub const fn size(&self) -> Size {
        match self {
            Self::Uhd4k => Size::new(3840, 2160),
            Self::Fhd1080p => Size::new(1920, 1080),
            Self::Hd720p => Size::new(1280, 720),
        }
    }

    /// Encoder bit rate paired with this resolution (bits per second)
    pub const fn bit_rate(&self) -> u32 {
        match self {
            Self::Uhd4k => 30_000_000,
            Self::Fhd1080p => 20_000_000,
            Self::Hd720p => 10_000_000,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uhd4k => "4k",
            Self::Fhd1080p => "1080p",
            Self::Hd720p => "720p",
        }
    }
}

impl FromStr for Resolution {
    type Err = InvalidResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "4k" | "2160p" | "uhd" => Ok(Self::Uhd4k),
            "1080p" | "fhd" => Ok(Self::Fhd1080p),
            "720p" | "hd" => Ok(Self::Hd720p),
            _ => Err(InvalidResolutionError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video codecs the encoder accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    #[default]
    Avc,
    Hevc,
}

impl VideoCodec {
    /// MIME identifier handed to the encoder
    pub const fn mime(&self) -> &'static str {
        match self {
            Self::Avc => "video/avc",
            Self::Hevc => "video/hevc",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Avc => "avc",
            Self::Hevc => "hevc",
        }
    }
}

impl FromStr for VideoCodec {
    type Err = InvalidCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "avc" | "h264" | "video/avc" => Ok(Self::Avc),
            "hevc" | "h265" | "video/hevc" => Ok(Self::Hevc),
            _ => Err(InvalidCodecError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the streams of a recording go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Surface the preview stream renders into
    pub preview_surface: String,
    /// Input surface of the video encoder
    pub encoder_surface: String,
    /// File the encoder writes to
    pub path: PathBuf,
}

/// Desired recording parameters.
/// Immutable once submitted for negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingRequest {
    pub size: Size,
    pub frame_rate: u32,
    pub hdr: bool,
    pub codec: VideoCodec,
    /// Bits per second
    pub bit_rate: u32,
    pub target: OutputTarget,
}

impl RecordingRequest {
    /// Request built from a resolution preset, using the preset's bit rate
    pub fn new(
        resolution: Resolution,
        frame_rate: u32,
        hdr: bool,
        codec: VideoCodec,
        target: OutputTarget,
    ) -> Self {
        Self {
            size: resolution.size(),
            frame_rate,
            hdr,
            codec,
            bit_rate: resolution.bit_rate(),
            target,
        }
    }

    /// 1080p, 30 fps, SDR AVC at 20 Mbit/s
    pub fn defaults(target: OutputTarget) -> Self {
        Self::new(
            Resolution::default(),
            DEFAULT_FRAME_RATE,
            false,
            VideoCodec::default(),
            target,
        )
    }

    /// Reject requests no hardware could ever satisfy
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.size.is_empty() {
            return Err(RequestError::EmptyResolution {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if self.frame_rate == 0 {
            return Err(RequestError::ZeroFrameRate);
        }
        if self.bit_rate == 0 {
            return Err(RequestError::ZeroBitRate);
        }
        if self.hdr && self.codec != VideoCodec::Hevc {
            return Err(RequestError::HdrRequiresHevc);
        }
        Ok(())
    }

    pub const fn dynamic_range(&self) -> &'static str {
        if self.hdr {
            "HDR"
        } else {
            "SDR"
        }
    }
}

impl fmt::Display for RecordingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} fps, {} {}, {} kbit/s",
            self.size,
            self.frame_rate,
            self.dynamic_range(),
            self.codec,
            self.bit_rate / 1000
        )
    }
}
