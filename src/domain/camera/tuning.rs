//! Session tuning knobs applied between commit and start

use std::fmt;

use serde::{Deserialize, Serialize};

/// Video stabilization modes a session may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizationMode {
    Off,
    Low,
    Middle,
    High,
    Auto,
}

impl StabilizationMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Low => "low",
            Self::Middle => "middle",
            Self::High => "high",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for StabilizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color spaces a video session can encode in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    Bt709Limit,
    Bt709Full,
    Bt2020HlgLimit,
    Bt2020HlgFull,
    Bt2020PqLimit,
}

impl ColorSpace {
    /// Color space used for a recording: wide-gamut HLG for HDR, BT.709 otherwise.
    /// Both use limited range.
    pub const fn for_recording(hdr: bool) -> Self {
        if hdr {
            Self::Bt2020HlgLimit
        } else {
            Self::Bt709Limit
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bt709Limit => "bt709-limited",
            Self::Bt709Full => "bt709-full",
            Self::Bt2020HlgLimit => "bt2020-hlg-limited",
            Self::Bt2020HlgFull => "bt2020-hlg-full",
            Self::Bt2020PqLimit => "bt2020-pq-limited",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
