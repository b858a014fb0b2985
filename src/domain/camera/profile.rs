//! Hardware-advertised capture profiles
//!
//! Profiles are read-only descriptors enumerated by the capability query.
//! The orchestrator never constructs them for the hardware, it only filters
//! and matches what the device reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Frame size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel formats a camera stream can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit YUV 4:2:0 semi-planar
    Yuv420Sp,
    /// 10-bit YCbCr 4:2:0, used by HDR video streams
    YcbcrP010,
    /// 10-bit YCrCb 4:2:0, used by HDR preview streams
    YcrcbP010,
    Rgba8888,
    Jpeg,
}

impl PixelFormat {
    /// Format a preview stream must use for the given dynamic range
    pub const fn preview_format(hdr: bool) -> Self {
        if hdr {
            Self::YcrcbP010
        } else {
            Self::Yuv420Sp
        }
    }

    /// Format a video stream must use for the given dynamic range
    pub const fn video_format(hdr: bool) -> Self {
        if hdr {
            Self::YcbcrP010
        } else {
            Self::Yuv420Sp
        }
    }

    pub const fn is_ten_bit(&self) -> bool {
        matches!(self, Self::YcbcrP010 | Self::YcrcbP010)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yuv420Sp => "yuv420sp",
            Self::YcbcrP010 => "ycbcr-p010",
            Self::YcrcbP010 => "ycrcb-p010",
            Self::Rgba8888 => "rgba8888",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive frame-rate range advertised by a video profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRateRange {
    pub min: u32,
    pub max: u32,
}

impl FrameRateRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A range pinned to a single rate
    pub const fn fixed(rate: u32) -> Self {
        Self {
            min: rate,
            max: rate,
        }
    }

    pub const fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    pub const fn contains(&self, rate: u32) -> bool {
        self.min <= rate && rate <= self.max
    }
}

impl fmt::Display for FrameRateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.min, self.max)
    }
}

/// Which stream of a session a profile or output belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Preview,
    Video,
}

impl StreamKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preview stream profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewProfile {
    pub format: PixelFormat,
    pub size: Size,
}

impl PreviewProfile {
    pub const fn new(format: PixelFormat, size: Size) -> Self {
        Self { format, size }
    }
}

impl fmt::Display for PreviewProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.size, self.format)
    }
}

/// Video (encoder) stream profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoProfile {
    pub format: PixelFormat,
    pub size: Size,
    pub frame_rate: FrameRateRange,
}

impl VideoProfile {
    pub const fn new(format: PixelFormat, size: Size, frame_rate: FrameRateRange) -> Self {
        Self {
            format,
            size,
            frame_rate,
        }
    }
}

impl fmt::Display for VideoProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {} fps", self.size, self.format, self.frame_rate)
    }
}

/// Everything a device offers for one scene mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCapability {
    pub preview_profiles: Vec<PreviewProfile>,
    pub video_profiles: Vec<VideoProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hdr_formats_are_ten_bit() {
        assert!(PixelFormat::preview_format(true).is_ten_bit());
        assert!(PixelFormat::video_format(true).is_ten_bit());
        assert!(!PixelFormat::preview_format(false).is_ten_bit());
        assert!(!PixelFormat::video_format(false).is_ten_bit());
    }

    #[test]
    fn frame_rate_range_contains() {
        let range = FrameRateRange::new(1, 30);
        assert!(range.contains(1));
        assert!(range.contains(30));
        assert!(!range.contains(31));
        assert!(!range.is_fixed());
        assert!(FrameRateRange::fixed(60).is_fixed());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Size::new(1920, 1080).to_string(), "1920x1080");
        assert_eq!(FrameRateRange::new(1, 30).to_string(), "[1,30]");
        let profile = VideoProfile::new(
            PixelFormat::Yuv420Sp,
            Size::new(1280, 720),
            FrameRateRange::fixed(60),
        );
        assert_eq!(profile.to_string(), "1280x720 yuv420sp @ [60,60] fps");
    }
}
