// SPDX-License-Identifier: MPL-2.0
//! Playback state machine states and session mode.

use serde::{Deserialize, Serialize};

/// Whether a session plays a live stream or an on-demand asset.
///
/// Fixed at construction. Governs live-edge behavior and the base of
/// percent-based seeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Sliding seekable window with a moving live edge.
    Live,
    /// Fixed `[0, duration]` timeline.
    OnDemand,
}

impl PlaybackMode {
    /// Returns true for live sessions.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Represents the current playback state of a session.
///
/// ```text
/// Idle ──loadedmetadata──▶ Ready ──play──▶ Playing ⇄ Paused ──ended──▶ Ended
///   └───────────── any state ── fatal engine error ──▶ Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Engine attached (or not yet) but metadata not loaded.
    #[default]
    Idle,
    /// Metadata loaded, not yet playing.
    Ready,
    /// Engine reported playback running.
    Playing,
    /// Engine reported playback paused.
    Paused,
    /// On-demand playback reached the end.
    Ended,
    /// Unrecoverable engine failure.
    Error,
}

impl PlaybackState {
    /// Returns true if the video is currently playing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if the video is paused.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true if the session failed.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if transport commands (play/pause) are accepted.
    #[must_use]
    pub fn accepts_transport(self) -> bool {
        !matches!(self, Self::Idle | Self::Error)
    }
}
