// SPDX-License-Identifier: MPL-2.0
//! Resolved transport settings.
//!
//! [`TransportSettings`] turns the optional, unvalidated fields of a
//! [`Config`] into the clamped newtypes the controller works with.

use crate::config::{self, Config};
use crate::domain::diagnostics::BufferCapacity;
use crate::domain::ui::OverlayTimeout;
use crate::domain::video::{KeyboardSeekStep, PlaybackMode, Volume};
use crate::player::state::SessionOptions;

/// Everything needed to build a [`PlaybackController`](crate::player::PlaybackController).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSettings {
    pub mode: PlaybackMode,
    pub session: SessionOptions,
    pub controls_timeout: OverlayTimeout,
    pub short_step: KeyboardSeekStep,
    pub long_step: KeyboardSeekStep,
    pub diagnostics_enabled: bool,
    pub diagnostics_capacity: BufferCapacity,
}

impl TransportSettings {
    /// Default settings for `mode`.
    #[must_use]
    pub fn new(mode: PlaybackMode) -> Self {
        Self::from_config(&Config::default(), mode)
    }

    /// Resolves a config, clamping every value into its valid range.
    #[must_use]
    pub fn from_config(config: &Config, mode: PlaybackMode) -> Self {
        let playback = &config.playback;
        let controls = &config.controls;
        let diagnostics = &config.diagnostics;

        let live_edge_threshold = playback
            .live_edge_threshold_secs
            .filter(|secs| secs.is_finite())
            .unwrap_or(config::DEFAULT_LIVE_EDGE_THRESHOLD_SECS)
            .clamp(0.0, config::MAX_LIVE_EDGE_THRESHOLD_SECS);

        Self {
            mode,
            session: SessionOptions {
                autoplay: playback.autoplay.unwrap_or(config::DEFAULT_AUTOPLAY),
                start_time: None,
                live_edge_threshold,
                volume: Volume::new(playback.volume.unwrap_or(config::DEFAULT_VOLUME)),
                muted: playback.muted.unwrap_or(false),
            },
            controls_timeout: OverlayTimeout::new(
                controls
                    .hide_delay_ms
                    .unwrap_or(config::DEFAULT_CONTROLS_HIDE_DELAY_MS),
            ),
            short_step: KeyboardSeekStep::new(
                controls
                    .seek_step_secs
                    .unwrap_or(config::DEFAULT_KEYBOARD_SEEK_STEP_SECS),
            ),
            long_step: KeyboardSeekStep::new(
                controls
                    .long_seek_step_secs
                    .unwrap_or(config::DEFAULT_LONG_SEEK_STEP_SECS),
            ),
            diagnostics_enabled: diagnostics
                .enabled
                .unwrap_or(config::DEFAULT_DIAGNOSTICS_ENABLED),
            diagnostics_capacity: BufferCapacity::new(
                diagnostics
                    .buffer_capacity
                    .unwrap_or(config::DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY),
            ),
        }
    }

    /// Sets the on-demand start position.
    #[must_use]
    pub fn with_start_time(mut self, secs: f64) -> Self {
        self.session.start_time = Some(secs);
        self
    }
}
