// SPDX-License-Identifier: MPL-2.0
//! Deterministic in-memory engine adapter.
//!
//! [`SimulatedEngine`] implements [`PlaybackEngine`] without decoding any
//! media. Tests, benches and headless hosts script it through a
//! [`SimulatedEngineHandle`]: set ranges and time, emit events, choose how
//! `play()` requests resolve. Every engine created by a
//! [`SimulatedEngineFactory`] stays reachable through the factory so a test
//! can inspect engines the controller already disposed.

use crate::application::port::engine::{
    EngineEvent, EngineEventSender, EngineFactory, EngineQualityLevel, MimeHint, PlayTicket,
    PlaybackEngine, SubscriptionId, TimeRanges,
};
use crate::domain::error::PlayerError;
use std::sync::{Arc, Mutex, MutexGuard};

/// How the simulated host answers `play()` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoplayPolicy {
    /// Every request succeeds.
    #[default]
    Allow,
    /// Only muted playback may start (typical browser policy).
    RequireMuted,
    /// Every request is rejected.
    Deny,
}

#[derive(Debug, Default)]
struct SimState {
    source: Option<(String, MimeHint)>,
    current_time: f64,
    volume: f32,
    muted: bool,
    playing: bool,
    seekable: TimeRanges,
    buffered: TimeRanges,
    duration: Option<f64>,
    levels: Vec<EngineQualityLevel>,
    subscribers: Vec<(SubscriptionId, EngineEventSender)>,
    next_subscription: u64,
    next_ticket: u64,
    policy: AutoplayPolicy,
    fail_source: Option<String>,
    seeks: Vec<f64>,
    play_requests: usize,
    disposed: bool,
}

impl SimState {
    fn emit(&mut self, event: &EngineEvent) {
        self.subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }
}

fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    // A panicking test thread must not hide the engine state from later assertions.
    state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Engine adapter backed by shared in-memory state.
#[derive(Debug)]
pub struct SimulatedEngine {
    state: Arc<Mutex<SimState>>,
}

/// Scripting and inspection handle for one [`SimulatedEngine`].
#[derive(Debug, Clone)]
pub struct SimulatedEngineHandle {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedEngine {
    /// Creates an engine and its scripting handle.
    #[must_use]
    pub fn new(policy: AutoplayPolicy) -> (Self, SimulatedEngineHandle) {
        let state = Arc::new(Mutex::new(SimState {
            volume: 1.0,
            policy,
            ..SimState::default()
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            SimulatedEngineHandle { state },
        )
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn set_source(&mut self, url: &str, mime: MimeHint) -> Result<(), PlayerError> {
        let mut state = lock(&self.state);
        if let Some(reason) = state.fail_source.clone() {
            return Err(PlayerError::Attach(reason));
        }
        state.source = Some((url.to_string(), mime));
        Ok(())
    }

    fn play(&mut self) -> PlayTicket {
        let mut state = lock(&self.state);
        state.next_ticket += 1;
        state.play_requests += 1;
        let ticket = PlayTicket(state.next_ticket);
        let result = match state.policy {
            AutoplayPolicy::Allow => Ok(()),
            AutoplayPolicy::RequireMuted if state.muted => Ok(()),
            AutoplayPolicy::RequireMuted => Err("NotAllowedError: unmuted autoplay".to_string()),
            AutoplayPolicy::Deny => Err("NotAllowedError: playback denied".to_string()),
        };
        let started = result.is_ok() && !state.playing;
        if result.is_ok() {
            state.playing = true;
        }
        state.emit(&EngineEvent::PlayOutcome { ticket, result });
        if started {
            state.emit(&EngineEvent::Play);
        }
        ticket
    }

    fn pause(&mut self) {
        let mut state = lock(&self.state);
        if state.playing {
            state.playing = false;
            state.emit(&EngineEvent::Pause);
        }
    }

    fn current_time(&self) -> f64 {
        lock(&self.state).current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        let mut state = lock(&self.state);
        state.current_time = secs;
        state.seeks.push(secs);
    }

    fn volume(&self) -> f32 {
        lock(&self.state).volume
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = lock(&self.state);
        state.volume = volume;
        state.emit(&EngineEvent::VolumeChange);
    }

    fn muted(&self) -> bool {
        lock(&self.state).muted
    }

    fn set_muted(&mut self, muted: bool) {
        let mut state = lock(&self.state);
        state.muted = muted;
        state.emit(&EngineEvent::VolumeChange);
    }

    fn seekable_ranges(&self) -> TimeRanges {
        lock(&self.state).seekable.clone()
    }

    fn buffered_ranges(&self) -> TimeRanges {
        lock(&self.state).buffered.clone()
    }

    fn duration(&self) -> Option<f64> {
        lock(&self.state).duration
    }

    fn quality_levels(&self) -> Vec<EngineQualityLevel> {
        lock(&self.state).levels.clone()
    }

    fn set_quality_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(level) = lock(&self.state).levels.get_mut(index) {
            level.enabled = enabled;
        }
    }

    fn subscribe(&mut self, sender: EngineEventSender) -> SubscriptionId {
        let mut state = lock(&self.state);
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);
        state.subscribers.push((id, sender));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        lock(&self.state).subscribers.retain(|(sub, _)| *sub != id);
    }

    fn dispose(&mut self) {
        let mut state = lock(&self.state);
        state.disposed = true;
        state.playing = false;
        state.subscribers.clear();
    }

    fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }
}

impl SimulatedEngineHandle {
    // -------------------------------------------------------------------------
    // Scripting
    // -------------------------------------------------------------------------

    /// Replaces the seekable window with a single range.
    pub fn set_seekable(&self, start: f64, end: f64) {
        lock(&self.state).seekable = TimeRanges::single(start, end);
    }

    pub fn set_buffered(&self, ranges: TimeRanges) {
        lock(&self.state).buffered = ranges;
    }

    pub fn set_duration(&self, duration: f64) {
        lock(&self.state).duration = Some(duration);
    }

    /// Moves the engine clock without recording a seek.
    pub fn set_time(&self, secs: f64) {
        lock(&self.state).current_time = secs;
    }

    pub fn set_policy(&self, policy: AutoplayPolicy) {
        lock(&self.state).policy = policy;
    }

    /// Makes the next `set_source` fail with the given reason.
    pub fn fail_source(&self, reason: impl Into<String>) {
        lock(&self.state).fail_source = Some(reason.into());
    }

    /// Appends a quality level (enabled, as engines add them) and emits
    /// [`EngineEvent::QualityLevelAdded`].
    pub fn add_quality_level(&self, height: u32, bitrate: u64) {
        let mut state = lock(&self.state);
        state.levels.push(EngineQualityLevel {
            height,
            bitrate,
            enabled: true,
        });
        state.emit(&EngineEvent::QualityLevelAdded);
    }

    /// Delivers an arbitrary event to every subscriber.
    pub fn emit(&self, event: EngineEvent) {
        lock(&self.state).emit(&event);
    }

    /// Emits `loadedmetadata`.
    pub fn load_metadata(&self) {
        self.emit(EngineEvent::LoadedMetadata);
    }

    /// Sets the clock and emits `timeupdate`.
    pub fn tick(&self, secs: f64) {
        let mut state = lock(&self.state);
        state.current_time = secs;
        state.emit(&EngineEvent::TimeUpdate);
    }

    /// Emits a fatal error.
    pub fn fail(&self, message: impl Into<String>) {
        self.emit(EngineEvent::Error(message.into()));
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn source(&self) -> Option<(String, MimeHint)> {
        lock(&self.state).source.clone()
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        lock(&self.state).current_time
    }

    /// Every position passed to `set_current_time`, in order.
    #[must_use]
    pub fn seeks(&self) -> Vec<f64> {
        lock(&self.state).seeks.clone()
    }

    #[must_use]
    pub fn play_requests(&self) -> usize {
        lock(&self.state).play_requests
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        lock(&self.state).volume
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        lock(&self.state).muted
    }

    #[must_use]
    pub fn enabled_levels(&self) -> Vec<bool> {
        lock(&self.state).levels.iter().map(|l| l.enabled).collect()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }
}

/// Factory producing [`SimulatedEngine`]s.
///
/// Clones share the list of created engines, so a test keeps one clone and
/// hands the other to the controller.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngineFactory {
    policy: AutoplayPolicy,
    created: Arc<Mutex<Vec<SimulatedEngineHandle>>>,
    fail_next: Arc<Mutex<Option<String>>>,
    reject_next_source: Arc<Mutex<Option<String>>>,
}

impl SimulatedEngineFactory {
    #[must_use]
    pub fn new(policy: AutoplayPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Makes the next `create` call fail.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self
            .fail_next
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(reason.into());
    }

    /// The next engine is created normally but rejects its source.
    pub fn fail_next_source(&self, reason: impl Into<String>) {
        *self
            .reject_next_source
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(reason.into());
    }

    /// Handle of the most recently created engine.
    #[must_use]
    pub fn latest(&self) -> Option<SimulatedEngineHandle> {
        self.handles().last().cloned()
    }

    /// Handles of every engine created so far, oldest first.
    #[must_use]
    pub fn handles(&self) -> Vec<SimulatedEngineHandle> {
        self.created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.handles().len()
    }
}

impl EngineFactory for SimulatedEngineFactory {
    fn create(&mut self) -> Result<Box<dyn PlaybackEngine>, PlayerError> {
        if let Some(reason) = self
            .fail_next
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
        {
            return Err(PlayerError::Attach(reason));
        }
        let (engine, handle) = SimulatedEngine::new(self.policy);
        if let Some(reason) = self
            .reject_next_source
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
        {
            handle.fail_source(reason);
        }
        self.created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(handle);
        Ok(Box::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn play_outcome_follows_policy() {
        let (mut engine, handle) = SimulatedEngine::new(AutoplayPolicy::RequireMuted);
        let (tx, rx) = unbounded();
        engine.subscribe(tx);

        let ticket = engine.play();
        assert!(matches!(
            rx.try_recv(),
            Ok(EngineEvent::PlayOutcome { ticket: t, result: Err(_) }) if t == ticket
        ));
        assert!(!handle.is_playing());

        engine.set_muted(true);
        assert_eq!(rx.try_recv(), Ok(EngineEvent::VolumeChange));
        let ticket = engine.play();
        assert_eq!(
            rx.try_recv(),
            Ok(EngineEvent::PlayOutcome {
                ticket,
                result: Ok(())
            })
        );
        assert_eq!(rx.try_recv(), Ok(EngineEvent::Play));
        assert!(handle.is_playing());
    }

    #[test]
    fn unsubscribe_and_dispose_stop_delivery() {
        let (mut engine, handle) = SimulatedEngine::new(AutoplayPolicy::Allow);
        let (tx, rx) = unbounded();
        let id = engine.subscribe(tx);
        assert_eq!(handle.subscriber_count(), 1);

        engine.unsubscribe(id);
        handle.load_metadata();
        assert!(rx.try_recv().is_err());

        engine.dispose();
        engine.dispose();
        assert!(engine.is_disposed());
        assert!(handle.is_disposed());
    }

    #[test]
    fn seeks_are_recorded() {
        let (mut engine, handle) = SimulatedEngine::new(AutoplayPolicy::Allow);
        engine.set_current_time(12.5);
        handle.set_time(20.0);
        engine.set_current_time(3.0);
        assert_eq!(handle.seeks(), vec![12.5, 3.0]);
        assert!((handle.current_time() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn factory_tracks_created_engines() {
        let factory = SimulatedEngineFactory::new(AutoplayPolicy::Allow);
        let mut owned = factory.clone();
        assert!(owned.create().is_ok());
        assert!(owned.create().is_ok());
        assert_eq!(factory.created_count(), 2);

        factory.fail_next("gpu lost");
        assert!(matches!(owned.create(), Err(PlayerError::Attach(_))));
        assert_eq!(factory.created_count(), 2);
    }

    #[test]
    fn quality_levels_are_mutable() {
        let (mut engine, handle) = SimulatedEngine::new(AutoplayPolicy::Allow);
        handle.add_quality_level(720, 2_500_000);
        handle.add_quality_level(1080, 5_000_000);
        engine.set_quality_enabled(0, false);
        engine.set_quality_enabled(9, false);
        assert_eq!(handle.enabled_levels(), vec![false, true]);
    }
}
