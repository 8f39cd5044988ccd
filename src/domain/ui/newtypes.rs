// SPDX-License-Identifier: MPL-2.0
//! Presentation timing values.

use std::time::Duration;

/// How long the controls linger after the last pointer or key activity, in
/// milliseconds.
pub mod overlay_bounds {
    pub const MIN_MS: u32 = 500;
    pub const MAX_MS: u32 = 30_000;
    pub const DEFAULT_MS: u32 = 3_000;
}

/// Idle delay before the controls hide while playing. Clamped to
/// half a second through thirty seconds.
///
/// ```
/// use stream_lens::domain::ui::OverlayTimeout;
///
/// assert_eq!(OverlayTimeout::new(5_000).value_ms(), 5_000);
/// assert_eq!(OverlayTimeout::new(100).value_ms(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTimeout(u32);

impl OverlayTimeout {
    #[must_use]
    pub fn new(value_ms: u32) -> Self {
        Self(value_ms.clamp(overlay_bounds::MIN_MS, overlay_bounds::MAX_MS))
    }

    #[must_use]
    pub fn value_ms(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0.into())
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 == overlay_bounds::MIN_MS
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 == overlay_bounds::MAX_MS
    }
}

impl Default for OverlayTimeout {
    fn default() -> Self {
        Self(overlay_bounds::DEFAULT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_delays_are_clamped() {
        assert_eq!(OverlayTimeout::new(0).value_ms(), overlay_bounds::MIN_MS);
        assert_eq!(
            OverlayTimeout::new(u32::MAX).value_ms(),
            overlay_bounds::MAX_MS
        );
    }

    #[test]
    fn default_is_three_seconds() {
        assert_eq!(
            OverlayTimeout::default().as_duration(),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn bounds_are_detected() {
        assert!(OverlayTimeout::new(500).is_min());
        assert!(OverlayTimeout::new(30_000).is_max());
        assert!(!OverlayTimeout::default().is_min());
        assert!(!OverlayTimeout::default().is_max());
    }
}
