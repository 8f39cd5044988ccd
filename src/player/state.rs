// SPDX-License-Identifier: MPL-2.0
//! Playback state machine and engine session.
//!
//! [`PlaybackStateMachine`] owns at most one attached engine at a time and
//! mirrors everything the transport needs from it: playback state, position,
//! ranges, volume and quality levels. Engine events are drained from the
//! subscription channel by [`PlaybackStateMachine::pump`]; every observable
//! consequence is queued as a [`Change`] for the controller to collect with
//! [`PlaybackStateMachine::take_changes`].
//!
//! ```text
//! Idle ──loadedmetadata──▶ Ready ──play──▶ Playing ⇄ Paused
//!                                             │
//!                                           ended (on-demand only)
//!                                             ▼
//!                                           Ended ──seek back──▶ Paused
//! any state ──fatal error──▶ Error
//! ```

use crate::application::port::engine::{
    EngineEvent, EngineEventReceiver, EngineFactory, MimeHint, PlayTicket, PlaybackEngine,
    SubscriptionId,
};
use crate::domain::error::PlayerError;
use crate::domain::video::{PlaybackMode, PlaybackState, QualityLevel, QualitySelection, Volume};
use crate::player::quality::QualityCatalog;
use crate::player::ranges::{RangeTracker, DEFAULT_LIVE_EDGE_THRESHOLD_SECS};
use crossbeam_channel::unbounded;
use log::{debug, error, info, warn};

/// Distance from the end used by the `End` shortcut, in seconds.
const END_KEY_OFFSET_SECS: f64 = 1.0;

/// Per-session options.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Request playback right after attach. Live sessions always autoplay.
    pub autoplay: bool,
    /// On-demand position applied once on the first `loadedmetadata`.
    pub start_time: Option<f64>,
    /// Distance from the live edge under which the stream counts as live.
    pub live_edge_threshold: f64,
    /// Volume pushed into every engine on attach.
    pub volume: Volume,
    pub muted: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            start_time: None,
            live_edge_threshold: DEFAULT_LIVE_EDGE_THRESHOLD_SECS,
            volume: Volume::default(),
            muted: false,
        }
    }
}

/// Result of an attach request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// A fresh engine was created and the source loaded.
    Attached,
    /// An engine is already attached; nothing was done.
    AlreadyAttached,
    /// The engine could not be created or rejected the source. The machine
    /// is now in [`PlaybackState::Error`].
    Failed,
}

/// Observable consequence of an operation or engine event.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Attached { url: String, mime: MimeHint },
    Detached,
    StateChanged {
        from: PlaybackState,
        to: PlaybackState,
    },
    /// Initial jump to the live edge.
    SnappedToLiveEdge(f64),
    /// On-demand start position applied.
    StartPositionApplied(f64),
    VolumeChanged,
    QualitiesChanged,
    /// Autoplay was refused; retrying muted.
    AutoplayRetried(String),
    /// A user-initiated play request was refused.
    PlayRejected(String),
    /// The session entered the error state.
    Failed(PlayerError),
}

/// Read-only snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub mode: PlaybackMode,
    pub state: PlaybackState,
    pub current_time: f64,
    pub seekable_start: f64,
    pub seekable_end: f64,
    pub buffered_end: f64,
    pub progress_percent: f64,
    pub buffered_percent: f64,
    pub is_live: bool,
    pub volume: Volume,
    pub muted: bool,
    pub qualities: Vec<QualityLevel>,
    pub selected_quality: QualitySelection,
    pub is_dragging: bool,
    pub controls_visible: bool,
    pub has_snapped_to_live_edge: bool,
}

struct Attachment {
    engine: Box<dyn PlaybackEngine>,
    events: EngineEventReceiver,
    subscription: SubscriptionId,
    url: String,
}

#[derive(Debug, Clone, Copy, Default)]
struct AutoplayAttempt {
    ticket: Option<PlayTicket>,
    retried: bool,
}

/// Drives one engine and mirrors its state.
pub struct PlaybackStateMachine {
    mode: PlaybackMode,
    options: SessionOptions,
    factory: Box<dyn EngineFactory>,
    attached: Option<Attachment>,
    state: PlaybackState,
    ranges: RangeTracker,
    quality: QualityCatalog,
    volume: Volume,
    muted: bool,
    last_audible_volume: Volume,
    dragging: bool,
    has_snapped: bool,
    start_applied: bool,
    engine_playing: bool,
    autoplay: AutoplayAttempt,
    error: Option<PlayerError>,
    changes: Vec<Change>,
}

impl std::fmt::Debug for PlaybackStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackStateMachine")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("url", &self.source_url())
            .field("current_time", &self.ranges.current_time())
            .finish_non_exhaustive()
    }
}

impl PlaybackStateMachine {
    #[must_use]
    pub fn new(mode: PlaybackMode, options: SessionOptions, factory: Box<dyn EngineFactory>) -> Self {
        Self {
            mode,
            ranges: RangeTracker::with_threshold(mode, options.live_edge_threshold),
            factory,
            attached: None,
            state: PlaybackState::Idle,
            quality: QualityCatalog::new(),
            volume: options.volume,
            muted: options.muted,
            last_audible_volume: if options.volume.is_silent() {
                Volume::default()
            } else {
                options.volume
            },
            dragging: false,
            has_snapped: false,
            start_applied: false,
            engine_playing: false,
            autoplay: AutoplayAttempt::default(),
            error: None,
            changes: Vec::new(),
            options,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates an engine, loads `url` and requests autoplay when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Attach`] for an empty URL. Engine failures do
    /// not return `Err`: they yield [`AttachOutcome::Failed`] and move the
    /// machine to [`PlaybackState::Error`].
    pub fn attach(&mut self, url: &str) -> Result<AttachOutcome, PlayerError> {
        if self.attached.is_some() {
            debug!("attach({url}) ignored: an engine is already attached");
            return Ok(AttachOutcome::AlreadyAttached);
        }
        let url = url.trim();
        if url.is_empty() {
            return Err(PlayerError::Attach("empty source url".to_string()));
        }

        self.reset_session();

        let mut engine = match self.factory.create() {
            Ok(engine) => engine,
            Err(err) => {
                self.fail(err);
                return Ok(AttachOutcome::Failed);
            }
        };

        let (sender, events) = unbounded();
        let subscription = engine.subscribe(sender);
        let mime = MimeHint::from_url(url);
        if let Err(err) = engine.set_source(url, mime) {
            engine.unsubscribe(subscription);
            engine.dispose();
            self.fail(err);
            return Ok(AttachOutcome::Failed);
        }

        engine.set_volume(self.volume.value());
        engine.set_muted(self.muted);

        info!("attached {mime} source {url} ({:?})", self.mode);
        self.changes.push(Change::Attached {
            url: url.to_string(),
            mime,
        });

        if self.mode.is_live() || self.options.autoplay {
            let ticket = engine.play();
            self.autoplay = AutoplayAttempt {
                ticket: Some(ticket),
                retried: false,
            };
        }

        self.attached = Some(Attachment {
            engine,
            events,
            subscription,
            url: url.to_string(),
        });
        Ok(AttachOutcome::Attached)
    }

    /// Unsubscribes, disposes the engine and resets the session.
    pub fn detach(&mut self) {
        let Some(attachment) = self.attached.take() else {
            return;
        };
        Self::release(attachment);
        self.reset_session();
        self.changes.push(Change::Detached);
    }

    /// Fully tears down the current engine before attaching `url`.
    ///
    /// # Errors
    ///
    /// Same as [`attach`](Self::attach).
    pub fn reattach(&mut self, url: &str) -> Result<AttachOutcome, PlayerError> {
        self.detach();
        self.attach(url)
    }

    fn release(mut attachment: Attachment) {
        attachment.engine.unsubscribe(attachment.subscription);
        attachment.engine.dispose();
        debug!("disposed engine for {}", attachment.url);
    }

    fn reset_session(&mut self) {
        self.set_state(PlaybackState::Idle);
        self.ranges = RangeTracker::with_threshold(self.mode, self.options.live_edge_threshold);
        self.quality.clear();
        self.dragging = false;
        self.has_snapped = false;
        self.start_applied = false;
        self.engine_playing = false;
        self.autoplay = AutoplayAttempt::default();
        self.error = None;
    }

    // =========================================================================
    // Event pump
    // =========================================================================

    /// Drains pending engine events. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let Some(attachment) = self.attached.as_ref() else {
            return 0;
        };
        let events: Vec<EngineEvent> = attachment.events.try_iter().collect();
        let count = events.len();
        for event in events {
            self.handle_engine_event(event);
        }
        count
    }

    /// Applies one engine event. Ignored when detached or in `Error`.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.attached.is_none() || self.state.is_error() {
            return;
        }
        match event {
            EngineEvent::Play => {
                self.engine_playing = true;
                if matches!(
                    self.state,
                    PlaybackState::Ready | PlaybackState::Paused | PlaybackState::Ended
                ) {
                    self.set_state(PlaybackState::Playing);
                }
            }
            EngineEvent::Pause => {
                self.engine_playing = false;
                if matches!(self.state, PlaybackState::Playing | PlaybackState::Ready) {
                    self.set_state(PlaybackState::Paused);
                }
            }
            EngineEvent::VolumeChange => self.mirror_volume(),
            EngineEvent::LoadedMetadata => self.on_loaded_metadata(),
            EngineEvent::TimeUpdate => {
                if !self.dragging {
                    if let Some(attachment) = self.attached.as_ref() {
                        self.ranges.set_current_time(attachment.engine.current_time());
                    }
                }
                self.refresh_ranges();
            }
            EngineEvent::Ended => {
                if self.mode.is_live() {
                    debug!("ignoring ended event on a live stream");
                    return;
                }
                self.engine_playing = false;
                self.set_state(PlaybackState::Ended);
            }
            EngineEvent::Error(message) => self.fail(PlayerError::Playback(message)),
            EngineEvent::QualityLevelAdded => self.refresh_qualities(),
            EngineEvent::QualityLevelChanged { active } => {
                self.quality.set_active(active);
                self.changes.push(Change::QualitiesChanged);
            }
            EngineEvent::PlayOutcome { ticket, result } => self.on_play_outcome(ticket, result),
        }
    }

    fn on_loaded_metadata(&mut self) {
        self.refresh_ranges();
        self.refresh_qualities();

        if self.state == PlaybackState::Idle {
            self.set_state(PlaybackState::Ready);
            if self.engine_playing {
                self.set_state(PlaybackState::Playing);
            }
        }

        match self.mode {
            PlaybackMode::Live => {
                if !self.has_snapped && self.ranges.has_window() {
                    let target = self.ranges.live_snap_target();
                    self.apply_seek(target);
                    self.has_snapped = true;
                    info!("snapped to live edge at {target:.1}s");
                    self.changes.push(Change::SnappedToLiveEdge(target));
                }
            }
            PlaybackMode::OnDemand => {
                if !self.start_applied {
                    self.start_applied = true;
                    if let Some(start) = self.options.start_time {
                        let target = self.ranges.clamp(start);
                        self.apply_seek(target);
                        self.changes.push(Change::StartPositionApplied(target));
                    }
                }
            }
        }
    }

    fn on_play_outcome(&mut self, ticket: PlayTicket, result: Result<(), String>) {
        if self.autoplay.ticket != Some(ticket) {
            if let Err(reason) = result {
                warn!("play request rejected: {reason}");
                self.changes.push(Change::PlayRejected(reason));
            }
            return;
        }
        self.autoplay.ticket = None;
        let Err(reason) = result else {
            return;
        };

        if self.autoplay.retried {
            error!("autoplay rejected twice: {reason}");
            self.fail(PlayerError::AutoplayRejected(reason));
            return;
        }

        warn!("autoplay rejected, retrying muted: {reason}");
        self.autoplay.retried = true;
        self.muted = true;
        if let Some(attachment) = self.attached.as_mut() {
            attachment.engine.set_muted(true);
            self.autoplay.ticket = Some(attachment.engine.play());
        }
        self.changes.push(Change::AutoplayRetried(reason));
    }

    fn mirror_volume(&mut self) {
        let Some(attachment) = self.attached.as_ref() else {
            return;
        };
        self.volume = Volume::new(attachment.engine.volume());
        self.muted = attachment.engine.muted();
        if !self.muted && !self.volume.is_silent() {
            self.last_audible_volume = self.volume;
        }
        self.changes.push(Change::VolumeChanged);
    }

    fn refresh_ranges(&mut self) {
        let Some(attachment) = self.attached.as_ref() else {
            return;
        };
        let engine = &attachment.engine;
        self.ranges.update(
            &engine.seekable_ranges(),
            &engine.buffered_ranges(),
            engine.duration(),
        );
        if self.state != PlaybackState::Idle && self.ranges.has_window() {
            let clamped = self.ranges.clamp(self.ranges.current_time());
            self.ranges.set_current_time(clamped);
        }
    }

    fn refresh_qualities(&mut self) {
        let Some(attachment) = self.attached.as_mut() else {
            return;
        };
        let levels = attachment.engine.quality_levels();
        let previous = self.quality.clone();
        if self.quality.refresh(&levels) {
            for (index, enabled) in self.quality.enabled_flags() {
                attachment.engine.set_quality_enabled(index, enabled);
            }
        }
        if self.quality != previous {
            self.changes.push(Change::QualitiesChanged);
        }
    }

    fn set_state(&mut self, to: PlaybackState) {
        if self.state != to {
            let from = self.state;
            self.state = to;
            debug!("playback state {from:?} -> {to:?}");
            self.changes.push(Change::StateChanged { from, to });
        }
    }

    /// Moves to `Error` once. Later failures are dropped.
    fn fail(&mut self, err: PlayerError) {
        if self.state.is_error() {
            return;
        }
        error!("playback failed: {err}");
        self.engine_playing = false;
        self.error = Some(err.clone());
        self.set_state(PlaybackState::Error);
        self.changes.push(Change::Failed(err));
    }

    // =========================================================================
    // Transport operations
    // =========================================================================

    /// Plays or pauses. No-op in `Idle` and `Error`.
    pub fn toggle_play(&mut self) {
        if !self.state.accepts_transport() {
            return;
        }
        let state = self.state;
        let start = self.ranges.seekable_start();
        let Some(attachment) = self.attached.as_mut() else {
            return;
        };
        match state {
            PlaybackState::Playing => attachment.engine.pause(),
            PlaybackState::Ended => {
                attachment.engine.set_current_time(start);
                attachment.engine.play();
                self.ranges.set_current_time(start);
                self.ranges.reset_buffer();
            }
            _ => {
                attachment.engine.play();
            }
        }
    }

    /// Seeks to `secs`, clamped into the seekable window.
    ///
    /// Returns the position actually requested. Nothing is sent to the
    /// engine while the window is empty or the session is in `Error`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NotAttached`] if no engine is attached.
    pub fn seek_to(&mut self, secs: f64) -> Result<f64, PlayerError> {
        if self.attached.is_none() {
            return Err(PlayerError::NotAttached);
        }
        if self.state.is_error() || !self.ranges.has_window() {
            return Ok(self.ranges.current_time());
        }
        let target = self.ranges.clamp(secs);
        self.apply_seek(target);
        Ok(target)
    }

    /// Seeks by `delta` seconds from the current position.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NotAttached`] if no engine is attached.
    pub fn seek_relative(&mut self, delta: f64) -> Result<f64, PlayerError> {
        self.seek_to(self.ranges.current_time() + delta)
    }

    /// Seeks to a `[0, 1]` fraction of the seekable window.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NotAttached`] if no engine is attached.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<f64, PlayerError> {
        match self.ranges.position_at_fraction(fraction) {
            Some(target) => self.seek_to(target),
            None => self.seek_to(self.ranges.current_time()),
        }
    }

    /// # Errors
    ///
    /// Returns [`PlayerError::NotAttached`] if no engine is attached.
    pub fn seek_to_start(&mut self) -> Result<f64, PlayerError> {
        self.seek_to(self.ranges.seekable_start())
    }

    /// Seeks one second before the end of the window.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NotAttached`] if no engine is attached.
    pub fn seek_to_end(&mut self) -> Result<f64, PlayerError> {
        self.seek_to(self.ranges.seekable_end() - END_KEY_OFFSET_SECS)
    }

    fn apply_seek(&mut self, target: f64) {
        if let Some(attachment) = self.attached.as_mut() {
            attachment.engine.set_current_time(target);
        }
        self.ranges.set_current_time(target);
        self.ranges.reset_buffer();
        // Leaving the end means the next play resumes here instead of restarting.
        if self.state == PlaybackState::Ended && target < self.ranges.seekable_end() {
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Sets the volume. A non-zero volume unmutes. No-op in `Error`.
    pub fn set_volume(&mut self, volume: f32) {
        self.apply_volume(Volume::new(volume), true);
    }

    /// One volume step up (unmutes) or down (keeps the muted flag).
    pub fn step_volume(&mut self, up: bool) {
        if up {
            self.apply_volume(self.volume.increase(), true);
        } else {
            self.apply_volume(self.volume.decrease(), false);
        }
    }

    fn apply_volume(&mut self, volume: Volume, unmute: bool) {
        if self.state.is_error() {
            return;
        }
        self.volume = volume;
        if !volume.is_silent() {
            self.last_audible_volume = volume;
        }
        let unmute = unmute && self.muted && !volume.is_silent();
        if unmute {
            self.muted = false;
        }
        match self.attached.as_mut() {
            Some(attachment) => {
                attachment.engine.set_volume(volume.value());
                if unmute {
                    attachment.engine.set_muted(false);
                }
            }
            None => self.changes.push(Change::VolumeChanged),
        }
    }

    /// Flips the muted flag. No-op in `Error`.
    pub fn toggle_mute(&mut self) {
        if self.state.is_error() {
            return;
        }
        self.muted = !self.muted;
        match self.attached.as_mut() {
            Some(attachment) => attachment.engine.set_muted(self.muted),
            None => self.changes.push(Change::VolumeChanged),
        }
    }

    /// Marks the scrub drag. While dragging, engine ticks do not move the
    /// mirrored position.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Enables every quality level. No-op in `Error`.
    pub fn select_quality_auto(&mut self) {
        if self.state.is_error() {
            return;
        }
        self.quality.select_auto();
        self.push_quality_flags();
    }

    /// Enables only quality level `id`. No-op in `Error`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::StaleQualitySelection`] if `id` is unknown.
    pub fn select_quality(&mut self, id: usize) -> Result<(), PlayerError> {
        if self.state.is_error() {
            return Ok(());
        }
        self.quality.select_manual(id)?;
        self.push_quality_flags();
        Ok(())
    }

    pub fn toggle_quality_menu(&mut self) {
        self.quality.toggle_menu();
        self.changes.push(Change::QualitiesChanged);
    }

    pub fn close_quality_menu(&mut self) {
        if self.quality.is_menu_open() {
            self.quality.close_menu();
            self.changes.push(Change::QualitiesChanged);
        }
    }

    fn push_quality_flags(&mut self) {
        if let Some(attachment) = self.attached.as_mut() {
            for (index, enabled) in self.quality.enabled_flags() {
                attachment.engine.set_quality_enabled(index, enabled);
            }
        }
        self.changes.push(Change::QualitiesChanged);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Takes the changes queued since the last call.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.attached.as_ref().map(|a| a.url.as_str())
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.ranges.current_time()
    }

    #[must_use]
    pub fn ranges(&self) -> &RangeTracker {
        &self.ranges
    }

    #[must_use]
    pub fn quality(&self) -> &QualityCatalog {
        &self.quality
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Last non-silent, unmuted volume. Hosts use it to restore a slider.
    #[must_use]
    pub fn last_audible_volume(&self) -> Volume {
        self.last_audible_volume
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn has_snapped_to_live_edge(&self) -> bool {
        self.has_snapped
    }

    #[must_use]
    pub fn error(&self) -> Option<&PlayerError> {
        self.error.as_ref()
    }

    /// Builds a render snapshot.
    #[must_use]
    pub fn session(&self, controls_visible: bool) -> PlaybackSession {
        PlaybackSession {
            mode: self.mode,
            state: self.state,
            current_time: self.ranges.current_time(),
            seekable_start: self.ranges.seekable_start(),
            seekable_end: self.ranges.seekable_end(),
            buffered_end: self.ranges.buffered_end(),
            progress_percent: self.ranges.progress_percent(),
            buffered_percent: self.ranges.buffered_percent(),
            is_live: self.ranges.is_live(),
            volume: self.volume,
            muted: self.muted,
            qualities: self.quality.levels().to_vec(),
            selected_quality: self.quality.selection(),
            is_dragging: self.dragging,
            controls_visible,
            has_snapped_to_live_edge: self.has_snapped,
        }
    }
}

impl Drop for PlaybackStateMachine {
    fn drop(&mut self) {
        if let Some(attachment) = self.attached.take() {
            Self::release(attachment);
        }
    }
}
