// SPDX-License-Identifier: MPL-2.0
//! Playback controller error taxonomy.

use std::fmt;

/// Errors raised by the playback controller and its components.
///
/// Only [`PlayerError::NotAttached`] and [`PlayerError::StaleQualitySelection`]
/// are ever returned to callers. The remaining variants describe engine
/// failures and are carried by the `Error` playback state and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The engine failed to initialize or to load the source.
    Attach(String),

    /// Autoplay was refused by the host policy. Recoverable: retried muted once.
    AutoplayRejected(String),

    /// The engine reported a fatal decode or network error.
    Playback(String),

    /// A quality id that is no longer present in the catalog was selected.
    StaleQualitySelection(usize),

    /// A transport command was issued before `attach`.
    NotAttached,
}

impl PlayerError {
    /// Returns true if the controller retries this condition on its own.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AutoplayRejected(_))
    }

    /// Returns a stable status key the host can map to a localized message.
    #[must_use]
    pub fn status_key(&self) -> &'static str {
        match self {
            Self::Attach(_) => "player-error-attach",
            Self::AutoplayRejected(_) => "player-error-autoplay",
            Self::Playback(_) => "player-error-playback",
            Self::StaleQualitySelection(_) => "player-error-stale-quality",
            Self::NotAttached => "player-error-not-attached",
        }
    }
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach(msg) => write!(f, "Failed to attach engine: {}", msg),
            Self::AutoplayRejected(msg) => write!(f, "Autoplay rejected: {}", msg),
            Self::Playback(msg) => write!(f, "Playback failed: {}", msg),
            Self::StaleQualitySelection(id) => {
                write!(f, "Quality level {} is no longer available", id)
            }
            Self::NotAttached => write!(f, "No engine attached"),
        }
    }
}

impl std::error::Error for PlayerError {}
