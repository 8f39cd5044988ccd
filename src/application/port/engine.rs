// SPDX-License-Identifier: MPL-2.0
//! Playback engine port definition.
//!
//! This module defines the [`PlaybackEngine`] trait: the narrow contract the
//! player components use to drive and observe an adaptive-streaming engine.
//! The engine itself (demuxing, decoding, ABR heuristics) lives behind it.
//!
//! # Design Notes
//!
//! - The engine is **stateful** and exclusively owned by one session
//! - Getters return the engine's latest view; they never block
//! - Events are pushed into a [`crossbeam_channel`] sender registered with
//!   [`PlaybackEngine::subscribe`] and drained by the controller on its own
//!   schedule, so engine callbacks never re-enter the controller
//! - `play()` is asynchronous: it returns a [`PlayTicket`] and the outcome
//!   arrives later as [`EngineEvent::PlayOutcome`]

use crate::domain::error::PlayerError;
use crossbeam_channel::{Receiver, Sender};
use std::fmt;

// =============================================================================
// Time ranges
// =============================================================================

/// A half-open interval of media time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the interval, never negative.
    #[must_use]
    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

/// Ordered sequence of time ranges as reported by the engine.
///
/// The controller only looks at the first start and the last end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeRanges(Vec<TimeRange>);

impl TimeRanges {
    #[must_use]
    pub fn new(ranges: Vec<TimeRange>) -> Self {
        Self(ranges)
    }

    /// Convenience constructor for the common single-range case.
    #[must_use]
    pub fn single(start: f64, end: f64) -> Self {
        Self(vec![TimeRange::new(start, end)])
    }

    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Start of the first range.
    #[must_use]
    pub fn first_start(&self) -> Option<f64> {
        self.0.first().map(|r| r.start)
    }

    /// End of the last range.
    #[must_use]
    pub fn last_end(&self) -> Option<f64> {
        self.0.last().map(|r| r.end)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeRange> {
        self.0.iter()
    }
}

// =============================================================================
// Source and quality descriptors
// =============================================================================

/// MIME type hint passed along with a source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeHint {
    /// HLS playlist (`application/x-mpegURL`).
    Hls,
    /// Progressive MP4 (`video/mp4`).
    Mp4,
}

impl MimeHint {
    /// Guesses the hint from a URL: `.m3u8` playlists are HLS, anything else MP4.
    ///
    /// Query strings and fragments are ignored.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".m3u8") {
            Self::Hls
        } else {
            Self::Mp4
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hls => "application/x-mpegURL",
            Self::Mp4 => "video/mp4",
        }
    }
}

impl fmt::Display for MimeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quality level as the engine reports it. The index in the engine's list
/// is its stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineQualityLevel {
    pub height: u32,
    pub bitrate: u64,
    pub enabled: bool,
}

// =============================================================================
// Events
// =============================================================================

/// Correlates a `play()` request with its asynchronous outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayTicket(pub u64);

/// Handle returned by [`PlaybackEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback started or resumed.
    Play,
    /// Playback paused.
    Pause,
    /// Volume or muted flag changed.
    VolumeChange,
    /// Stream metadata (duration, seekable window) is available.
    LoadedMetadata,
    /// Periodic position report.
    TimeUpdate,
    /// On-demand playback reached the end.
    Ended,
    /// Fatal decode or network error.
    Error(String),
    /// A quality level was appended to the engine's list.
    QualityLevelAdded,
    /// The rendition being played changed.
    QualityLevelChanged { active: Option<usize> },
    /// Resolution of a `play()` request. `Err` carries the rejection reason.
    PlayOutcome {
        ticket: PlayTicket,
        result: Result<(), String>,
    },
}

/// Sending half handed to the engine on subscription.
pub type EngineEventSender = Sender<EngineEvent>;

/// Receiving half drained by the controller.
pub type EngineEventReceiver = Receiver<EngineEvent>;

// =============================================================================
// PlaybackEngine Trait
// =============================================================================

/// Port for an adaptive-streaming playback engine.
///
/// # Lifecycle
///
/// 1. Obtain a fresh instance from an [`EngineFactory`]
/// 2. `subscribe()` an event sender
/// 3. `set_source()` and `play()`
/// 4. Drive with `pause()`, `set_current_time()`, volume and quality calls
/// 5. `unsubscribe()` then `dispose()`
///
/// # Thread Safety
///
/// Implementations must be `Send` so a host may move a session between
/// threads. The controller itself never shares the engine.
pub trait PlaybackEngine: Send {
    /// Loads a source.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Attach`] if the engine cannot load the source.
    fn set_source(&mut self, url: &str, mime: MimeHint) -> Result<(), PlayerError>;

    /// Requests playback. The outcome is reported as [`EngineEvent::PlayOutcome`].
    fn play(&mut self) -> PlayTicket;

    fn pause(&mut self);

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn seekable_ranges(&self) -> TimeRanges;

    fn buffered_ranges(&self) -> TimeRanges;

    /// Media duration. Only meaningful for on-demand sources.
    fn duration(&self) -> Option<f64>;

    fn quality_levels(&self) -> Vec<EngineQualityLevel>;

    /// Sets the enabled flag of the level at `index`. Unknown indices are ignored.
    fn set_quality_enabled(&mut self, index: usize, enabled: bool);

    /// Registers an event sender.
    fn subscribe(&mut self, sender: EngineEventSender) -> SubscriptionId;

    /// Unregisters a sender. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Releases all engine resources. Idempotent.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Creates fresh engine instances, one per attached session.
pub trait EngineFactory {
    /// # Errors
    ///
    /// Returns [`PlayerError::Attach`] if the engine cannot be initialized.
    fn create(&mut self) -> Result<Box<dyn PlaybackEngine>, PlayerError>;
}

impl<F> EngineFactory for F
where
    F: FnMut() -> Result<Box<dyn PlaybackEngine>, PlayerError>,
{
    fn create(&mut self) -> Result<Box<dyn PlaybackEngine>, PlayerError> {
        self()
    }
}
