//! Mapping from a normalized 2-D control surface to tone parameters.

use serde::{Deserialize, Serialize};

/// Playable frequency span of the control surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min: f64,
    pub max: f64,
}

impl FrequencyRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Horizontal position in [0, 1] of `frequency` (unclamped).
    pub fn position_of(&self, frequency: f64) -> f64 {
        (frequency - self.min) / self.span()
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self::new(20.0, 2000.0)
    }
}

/// Frequency for horizontal position `x` (0 = left edge), clamped to the range.
///
/// An inverted range pins the result to `min`; it never panics.
pub fn pointer_frequency(x: f64, range: FrequencyRange) -> f64 {
    (range.min + x * range.span()).min(range.max).max(range.min)
}

/// Amplitude for vertical position `y` (0 = top edge).
///
/// Height is inverted so the top is loudest, remapped to [1, 10] and
/// log10-scaled, giving 0 at the bottom and 1 at the top.
pub fn pointer_amplitude(y: f64) -> f64 {
    let level = (1.0 - y).clamp(0.0, 1.0);
    (9.0 * level + 1.0).log10()
}

/// Master gain for a volume slider in [1, 10].
pub fn master_gain(slider: f64) -> f64 {
    slider.clamp(1.0, 10.0).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_is_linear_and_clamped() {
        let range = FrequencyRange::default();
        assert_eq!(pointer_frequency(0.0, range), 20.0);
        assert_eq!(pointer_frequency(1.0, range), 2000.0);
        assert_eq!(pointer_frequency(0.5, range), 1010.0);
        assert_eq!(pointer_frequency(-0.2, range), 20.0);
        assert_eq!(pointer_frequency(1.7, range), 2000.0);
        assert_eq!(range.position_of(1010.0), 0.5);
    }

    #[test]
    fn inverted_or_nan_range_does_not_panic() {
        let inverted = FrequencyRange::new(2000.0, 20.0);
        assert_eq!(pointer_frequency(0.5, inverted), 2000.0);
        assert_eq!(pointer_frequency(0.0, inverted), 2000.0);

        let nan = FrequencyRange::new(20.0, f64::NAN);
        assert_eq!(pointer_frequency(0.5, nan), 20.0);
    }

    #[test]
    fn amplitude_is_log_scaled_and_inverted() {
        assert_eq!(pointer_amplitude(0.0), 1.0);
        assert_eq!(pointer_amplitude(1.0), 0.0);
        assert_eq!(pointer_amplitude(2.0), 0.0);
        let mid = pointer_amplitude(0.5);
        assert!((mid - 5.5f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn master_gain_spans_zero_to_one() {
        assert_eq!(master_gain(1.0), 0.0);
        assert_eq!(master_gain(10.0), 1.0);
        assert_eq!(master_gain(0.0), 0.0);
        assert!((master_gain(7.2) - 0.857_332_496).abs() < 1e-6);
    }
}
