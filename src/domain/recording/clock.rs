//! Recording clock value object

use std::fmt;

/// What the clock shows before the first tick
pub const ZERO_DISPLAY: &str = "00:00";

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;

/// Elapsed recording time, advanced one second per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RecordingClock {
    elapsed_secs: u64,
}

impl RecordingClock {
    /// A clock at zero
    pub const fn new() -> Self {
        Self { elapsed_secs: 0 }
    }

    /// Advance by one second and return the new elapsed time
    pub fn tick(&mut self) -> u64 {
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        self.elapsed_secs
    }

    pub fn reset(&mut self) {
        self.elapsed_secs = 0;
    }

    pub const fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub const fn is_zero(&self) -> bool {
        self.elapsed_secs == 0
    }
}

impl fmt::Display for RecordingClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_elapsed(self.elapsed_secs))
    }
}

/// Format seconds as `mm:ss`, switching to `hh:mm:ss` past 59:59
pub fn format_elapsed(secs: u64) -> String {
    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = secs % SECS_PER_MINUTE;

    if hours == 0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_reads_zero() {
        let clock = RecordingClock::new();
        assert!(clock.is_zero());
        assert_eq!(clock.to_string(), ZERO_DISPLAY);
    }

    #[test]
    fn sixty_five_ticks_read_one_minute_five() {
        let mut clock = RecordingClock::new();
        for _ in 0..65 {
            clock.tick();
        }
        assert_eq!(clock.elapsed_secs(), 65);
        assert_eq!(clock.to_string(), "01:05");
    }

    #[test]
    fn reset_returns_to_zero_display() {
        let mut clock = RecordingClock::new();
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.to_string(), "00:00");
    }

    #[test]
    fn format_boundaries() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(3599), "59:59");
        assert_eq!(format_elapsed(3600), "01:00:00");
        assert_eq!(format_elapsed(3661), "01:01:01");
        assert_eq!(format_elapsed(36_000 + 59), "10:00:59");
    }
}
