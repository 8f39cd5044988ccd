// SPDX-License-Identifier: MPL-2.0
//! Clamped transport values.
//!
//! Out-of-range input is clamped on construction, so a [`Volume`] or a
//! [`KeyboardSeekStep`] held anywhere in the crate is always valid.

// =============================================================================
// Volume
// =============================================================================

/// Volume bounds, as a linear gain.
pub mod volume_bounds {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;
    pub const DEFAULT: f32 = 1.0;
    /// Change applied by one Up/Down key press.
    pub const STEP: f32 = 0.1;
    /// Gains below this count as silence.
    pub const SILENCE: f32 = 0.001;
}

/// Linear volume in `[0, 1]`. Independent of the muted flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Clamps `volume` into range. NaN becomes silence.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_nan() {
            Self(volume_bounds::MIN)
        } else {
            Self(volume.clamp(volume_bounds::MIN, volume_bounds::MAX))
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 < volume_bounds::SILENCE
    }

    /// One key step louder.
    #[must_use]
    pub fn increase(self) -> Self {
        Self::new(self.0 + volume_bounds::STEP)
    }

    /// One key step quieter.
    #[must_use]
    pub fn decrease(self) -> Self {
        Self::new(self.0 - volume_bounds::STEP)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(volume_bounds::DEFAULT)
    }
}

// =============================================================================
// KeyboardSeekStep
// =============================================================================

/// Seek step bounds in seconds.
pub mod seek_step_bounds {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 60.0;
    /// Arrow keys.
    pub const DEFAULT: f64 = 5.0;
    /// J and L.
    pub const DEFAULT_LONG: f64 = 10.0;
}

/// Distance covered by one seek shortcut, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardSeekStep(f64);

impl KeyboardSeekStep {
    /// Clamps `secs` into range. NaN falls back to the default step.
    #[must_use]
    pub fn new(secs: f64) -> Self {
        if secs.is_nan() {
            return Self::default();
        }
        Self(secs.clamp(seek_step_bounds::MIN, seek_step_bounds::MAX))
    }

    /// Default J/L step.
    #[must_use]
    pub fn long() -> Self {
        Self(seek_step_bounds::DEFAULT_LONG)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= seek_step_bounds::MIN
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= seek_step_bounds::MAX
    }
}

impl Default for KeyboardSeekStep {
    fn default() -> Self {
        Self(seek_step_bounds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn volume_is_clamped() {
        assert_abs_diff_eq!(Volume::new(-0.5).value(), 0.0);
        assert_abs_diff_eq!(Volume::new(2.0).value(), 1.0);
        assert_abs_diff_eq!(Volume::new(0.35).value(), 0.35);
        assert!(Volume::new(f32::NAN).is_silent());
    }

    #[test]
    fn volume_steps_stop_at_bounds() {
        let half = Volume::new(0.5);
        assert_abs_diff_eq!(half.increase().value(), 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(half.decrease().value(), 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(Volume::new(0.95).increase().value(), 1.0);
        assert!(Volume::new(0.05).decrease().is_silent());
    }

    #[test]
    fn full_volume_by_default() {
        assert_abs_diff_eq!(Volume::default().value(), volume_bounds::DEFAULT);
    }

    #[test]
    fn seek_step_is_clamped() {
        assert!(KeyboardSeekStep::new(0.0).is_min());
        assert!(KeyboardSeekStep::new(600.0).is_max());
        assert_abs_diff_eq!(KeyboardSeekStep::new(7.5).value(), 7.5);
        assert_eq!(KeyboardSeekStep::new(f64::NAN), KeyboardSeekStep::default());
    }

    #[test]
    fn short_and_long_defaults() {
        assert_abs_diff_eq!(KeyboardSeekStep::default().value(), 5.0);
        assert_abs_diff_eq!(KeyboardSeekStep::long().value(), 10.0);
    }
}
