//! Recording length limit

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::DurationParseError;

/// Upper bound on how long a recording runs before it is stopped.
/// Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordingLimit {
    secs: u64,
}

impl RecordingLimit {
    /// `None` for zero
    pub const fn from_secs(secs: u64) -> Option<Self> {
        if secs == 0 {
            None
        } else {
            Some(Self { secs })
        }
    }

    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    pub const fn as_std(&self) -> Duration {
        Duration::from_secs(self.secs)
    }
}

impl FromStr for RecordingLimit {
    type Err = DurationParseError;

    /// Accepts `30s`, `5m`, `1h`, `1h2m`, `2m30s`; units in descending order
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        let mut total: u64 = 0;
        let mut digits = String::new();
        let mut last_unit = u64::MAX;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }

            let unit = match ch {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return Err(invalid()),
            };
            if digits.is_empty() || unit >= last_unit {
                return Err(invalid());
            }

            let value: u64 = digits.parse().map_err(|_| invalid())?;
            total = value
                .checked_mul(unit)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(invalid)?;
            digits.clear();
            last_unit = unit;
        }

        if !digits.is_empty() || last_unit == u64::MAX {
            return Err(invalid());
        }

        Self::from_secs(total).ok_or_else(invalid)
    }
}

impl fmt::Display for RecordingLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.secs / 3600;
        let minutes = (self.secs % 3600) / 60;
        let seconds = self.secs % 60;

        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        if seconds > 0 {
            write!(f, "{}s", seconds)?;
        }
        Ok(())
    }
}
