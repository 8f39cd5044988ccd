// SPDX-License-Identifier: MPL-2.0
//! Seekable/buffered window tracking.
//!
//! [`RangeTracker`] holds the latest snapshot of the engine's seekable window,
//! buffered end and playback position, and derives everything the transport
//! bar needs from it: progress and buffer percentages, the live-edge flag and
//! the mapping between a fraction of the track and a media position.

use crate::application::port::engine::TimeRanges;
use crate::domain::video::PlaybackMode;

pub use crate::config::DEFAULT_LIVE_EDGE_THRESHOLD_SECS;

/// Derived view over the engine's time ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTracker {
    mode: PlaybackMode,
    seekable_start: f64,
    seekable_end: f64,
    buffered_end: f64,
    current_time: f64,
    live_edge_threshold: f64,
}

impl RangeTracker {
    #[must_use]
    pub fn new(mode: PlaybackMode) -> Self {
        Self::with_threshold(mode, DEFAULT_LIVE_EDGE_THRESHOLD_SECS)
    }

    #[must_use]
    pub fn with_threshold(mode: PlaybackMode, live_edge_threshold: f64) -> Self {
        Self {
            mode,
            seekable_start: 0.0,
            seekable_end: 0.0,
            buffered_end: 0.0,
            current_time: 0.0,
            live_edge_threshold: live_edge_threshold.max(0.0),
        }
    }

    /// Refreshes the window from the engine.
    ///
    /// Live sessions use the first seekable start and last seekable end.
    /// On-demand sessions use `[0, duration]`, falling back to the seekable
    /// end while the duration is unknown. The buffered end never moves
    /// backwards until [`reset_buffer`](Self::reset_buffer) is called.
    pub fn update(&mut self, seekable: &TimeRanges, buffered: &TimeRanges, duration: Option<f64>) {
        match self.mode {
            PlaybackMode::Live => {
                self.seekable_start = seekable.first_start().unwrap_or(0.0);
                self.seekable_end = seekable.last_end().unwrap_or(0.0);
            }
            PlaybackMode::OnDemand => {
                self.seekable_start = 0.0;
                self.seekable_end = duration
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .or_else(|| seekable.last_end())
                    .unwrap_or(0.0);
            }
        }
        if let Some(end) = buffered.last_end().filter(|e| e.is_finite()) {
            self.buffered_end = self.buffered_end.max(end);
        }
    }

    /// Forgets the buffered end (after a seek or a re-attach).
    pub fn reset_buffer(&mut self) {
        self.buffered_end = 0.0;
    }

    pub fn set_current_time(&mut self, secs: f64) {
        self.current_time = secs;
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn seekable_start(&self) -> f64 {
        self.seekable_start
    }

    #[must_use]
    pub fn seekable_end(&self) -> f64 {
        self.seekable_end
    }

    #[must_use]
    pub fn buffered_end(&self) -> f64 {
        self.buffered_end
    }

    #[must_use]
    pub fn seekable_duration(&self) -> f64 {
        (self.seekable_end - self.seekable_start).max(0.0)
    }

    #[must_use]
    pub fn has_window(&self) -> bool {
        self.seekable_duration() > 0.0
    }

    /// Playback position as a percentage of the seekable window.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.percent_of(self.current_time)
    }

    /// Buffered end as a percentage of the seekable window.
    #[must_use]
    pub fn buffered_percent(&self) -> f64 {
        self.percent_of(self.buffered_end)
    }

    fn percent_of(&self, secs: f64) -> f64 {
        let range = self.seekable_duration();
        if range <= 0.0 {
            return 0.0;
        }
        (((secs - self.seekable_start) / range) * 100.0).clamp(0.0, 100.0)
    }

    /// Whether a live stream is within the threshold of its edge.
    ///
    /// Always false for on-demand sessions.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.mode.is_live()
            && self.seekable_end > 0.0
            && (self.seekable_end - self.current_time) < self.live_edge_threshold
    }

    /// Clamps a position into the seekable window.
    #[must_use]
    pub fn clamp(&self, secs: f64) -> f64 {
        let secs = if secs.is_finite() { secs } else { self.seekable_start };
        secs.max(self.seekable_start).min(self.seekable_end.max(self.seekable_start))
    }

    /// Maps a `[0, 1]` fraction of the track into the seekable window.
    ///
    /// Returns `None` when the window is empty.
    #[must_use]
    pub fn position_at_fraction(&self, fraction: f64) -> Option<f64> {
        if !self.has_window() {
            return None;
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some(self.seekable_start + fraction * self.seekable_duration())
    }

    /// Live-edge target used by the initial snap: two seconds behind the end,
    /// never before the window start.
    #[must_use]
    pub fn live_snap_target(&self) -> f64 {
        self.seekable_start.max(self.seekable_end - 2.0)
    }
}
