//! Zoom range and gesture baseline

use std::fmt;

/// Zoom ratios supported by a running session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Build a range, swapping the bounds if they arrive reversed
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Both bounds are finite and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Clamp a ratio into the range. Never panics, even on a bad range.
    pub fn clamp(&self, ratio: f64) -> f64 {
        ratio.max(self.min).min(self.max)
    }

    pub fn contains(&self, ratio: f64) -> bool {
        ratio >= self.min && ratio <= self.max
    }
}

impl fmt::Display for ZoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}x, {:.2}x]", self.min, self.max)
    }
}

/// Committed zoom baseline of one gesture sequence.
///
/// Updates scale the committed baseline, not the last proposed ratio, so a
/// pinch that reports cumulative scale factors does not compound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    ratio: f64,
    range: ZoomRange,
}

impl ZoomState {
    pub fn new(ratio: f64, range: ZoomRange) -> Self {
        let ratio = if ratio.is_finite() {
            range.clamp(ratio)
        } else {
            range.min
        };
        Self { ratio, range }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn range(&self) -> ZoomRange {
        self.range
    }

    /// Ratio a gesture with `scale` asks for, already clamped.
    /// `None` for scale factors that are not finite and positive.
    pub fn propose(&self, scale: f64) -> Option<f64> {
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        Some(self.range.clamp(self.ratio * scale))
    }

    /// Adopt the authoritative ratio read back from hardware
    pub fn commit(&mut self, ratio: f64) {
        if ratio.is_finite() {
            self.ratio = self.range.clamp(ratio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ZoomState {
        ZoomState::new(1.0, ZoomRange::new(1.0, 10.0))
    }

    #[test]
    fn propose_scales_baseline() {
        let zoom = state();
        assert_eq!(zoom.propose(2.5), Some(2.5));
        // Baseline unchanged until commit
        assert_eq!(zoom.propose(2.0), Some(2.0));
    }

    #[test]
    fn propose_clamps_to_bounds() {
        let zoom = state();
        assert_eq!(zoom.propose(50.0), Some(10.0));
        assert_eq!(zoom.propose(0.01), Some(1.0));
    }

    #[test]
    fn propose_rejects_bad_scale() {
        let zoom = state();
        assert_eq!(zoom.propose(0.0), None);
        assert_eq!(zoom.propose(-1.0), None);
        assert_eq!(zoom.propose(f64::NAN), None);
        assert_eq!(zoom.propose(f64::INFINITY), None);
    }

    #[test]
    fn commit_moves_baseline() {
        let mut zoom = state();
        zoom.commit(4.0);
        assert_eq!(zoom.ratio(), 4.0);
        assert_eq!(zoom.propose(0.5), Some(2.0));
    }

    #[test]
    fn commit_is_clamped() {
        let mut zoom = state();
        zoom.commit(20.0);
        assert_eq!(zoom.ratio(), 10.0);
        zoom.commit(f64::NAN);
        assert_eq!(zoom.ratio(), 10.0);
    }

    #[test]
    fn ratio_stays_in_range_over_any_sequence() {
        let mut zoom = state();
        for scale in [3.0, 0.2, 7.5, 12.0, 0.001, 1.7, 0.9] {
            if let Some(ratio) = zoom.propose(scale) {
                assert!(zoom.range().contains(ratio));
                zoom.commit(ratio);
            }
        }
        assert!(zoom.range().contains(zoom.ratio()));
    }

    #[test]
    fn reversed_range_is_normalized() {
        let range = ZoomRange::new(6.0, 0.5);
        assert_eq!(range.min, 0.5);
        assert_eq!(range.max, 6.0);
        assert_eq!(range.to_string(), "[0.50x, 6.00x]");
    }

    #[test]
    fn non_finite_bounds_do_not_panic() {
        let range = ZoomRange::new(f64::NAN, 10.0);
        assert!(!range.is_valid());
        assert!(!ZoomRange::new(1.0, f64::INFINITY).is_valid());
        assert!(ZoomRange::new(1.0, 10.0).is_valid());

        let zoom = ZoomState::new(1.0, range);
        assert!(zoom.propose(2.0).is_some());
    }

    #[test]
    fn non_finite_start_ratio_uses_minimum() {
        let zoom = ZoomState::new(f64::NAN, ZoomRange::new(1.0, 10.0));
        assert_eq!(zoom.ratio(), 1.0);
    }
}
