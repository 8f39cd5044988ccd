// SPDX-License-Identifier: MPL-2.0
//! Transient seek feedback (`+5s`, `-10s`) shown over the video.

use std::time::{Duration, Instant};

/// How long a seek indicator stays on screen.
pub const SEEK_INDICATOR_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeekIndicator {
    text: Option<String>,
    expires_at: Option<Instant>,
}

impl SeekIndicator {
    /// Shows `text`, replacing any indicator still on screen.
    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.text = Some(text.into());
        self.expires_at = Some(now + SEEK_INDICATOR_DURATION);
    }

    /// Expires the indicator. Returns true if it was just hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(at) if now >= at => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.expires_at = None;
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_half_a_second() {
        let t0 = Instant::now();
        let mut indicator = SeekIndicator::default();
        indicator.show("+5s", t0);

        assert!(!indicator.tick(t0 + Duration::from_millis(499)));
        assert_eq!(indicator.text(), Some("+5s"));
        assert!(indicator.tick(t0 + Duration::from_millis(500)));
        assert!(!indicator.is_visible());
    }

    #[test]
    fn new_seek_restarts_the_indicator() {
        let t0 = Instant::now();
        let mut indicator = SeekIndicator::default();
        indicator.show("+5s", t0);
        indicator.show("-10s", t0 + Duration::from_millis(400));

        assert!(!indicator.tick(t0 + Duration::from_millis(600)));
        assert_eq!(indicator.text(), Some("-10s"));
    }

    #[test]
    fn tick_without_indicator_is_noop() {
        let mut indicator = SeekIndicator::default();
        assert!(!indicator.tick(Instant::now()));
    }
}
