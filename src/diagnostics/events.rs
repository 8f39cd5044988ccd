// SPDX-License-Identifier: MPL-2.0
//! What the session log records.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::domain::error::PlayerError;
use crate::domain::video::PlaybackState;

/// User-initiated transport actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    // session
    /// Attach a source.
    Attach {
        /// MIME hint derived from the URL.
        mime: String,
    },

    /// Detach the current source.
    Detach,

    // transport
    /// Toggle play/pause state.
    TogglePlayback,

    /// Seek to an absolute position.
    Seek {
        /// Target position in seconds.
        position_secs: f64,
    },

    /// Seek relative to the current position (keyboard).
    SeekRelative {
        /// Offset in seconds.
        delta_secs: f64,
    },

    /// Scrub drag started on the progress track.
    ScrubStart,

    /// Scrub drag released.
    ScrubEnd {
        /// Position in seconds when released.
        position_secs: f64,
    },

    // audio
    SetVolume {
        volume: f32,
    },

    ToggleMute,

    // view
    ToggleFullscreen,

    /// Pick a quality level.
    SelectQuality {
        /// `Auto` or a `{height}p` label.
        label: String,
    },
}

/// Playback lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state_event", rename_all = "snake_case")]
pub enum PlaybackStateEvent {
    /// The playback state machine moved.
    Transition {
        from: PlaybackState,
        to: PlaybackState,
    },
    /// Initial jump to the live edge.
    SnappedToLiveEdge { position_secs: f64 },
    /// Autoplay was retried muted.
    AutoplayRetried,
}

/// Category of a non-fatal condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    AutoplayRejected,
    PlayRejected,
    StaleQualitySelection,
    Other,
}

/// Category of a fatal condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Attach,
    Autoplay,
    Playback,
    Other,
}

impl From<&PlayerError> for ErrorType {
    fn from(err: &PlayerError) -> Self {
        match err {
            PlayerError::Attach(_) => Self::Attach,
            PlayerError::AutoplayRejected(_) => Self::Autoplay,
            PlayerError::Playback(_) => Self::Playback,
            PlayerError::StaleQualitySelection(_) | PlayerError::NotAttached => Self::Other,
        }
    }
}

/// Non-fatal condition, e.g. a muted autoplay retry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarningEvent {
    pub warning_type: WarningType,
    pub message: String,
}

impl WarningEvent {
    #[must_use]
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// Condition that moved the player to `Error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEvent {
    pub error_type: ErrorType,
    pub message: String,
}

impl ErrorEvent {
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

impl From<&PlayerError> for ErrorEvent {
    fn from(err: &PlayerError) -> Self {
        Self::new(ErrorType::from(err), err.to_string())
    }
}

/// One log entry. The monotonic stamp becomes a millisecond offset on export.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Stamped now.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self::with_timestamp(kind, Instant::now())
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// Serialized with a `type` tag next to the payload fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    PlaybackState {
        event: PlaybackStateEvent,
    },
    Warning {
        event: WarningEvent,
    },
    Error {
        event: ErrorEvent,
    },
}
