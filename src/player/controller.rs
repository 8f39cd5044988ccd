// SPDX-License-Identifier: MPL-2.0
//! Transport controller.
//!
//! [`PlaybackController`] wires the state machine, the input mapper and the
//! two timers (controls auto-hide and seek indicator) together. Hosts feed it
//! [`Message`]s with the current [`Instant`] and react to the returned
//! [`Effect`]s. Engine events are only applied on [`Message::Tick`] or an
//! explicit [`PlaybackController::pump`].

use crate::application::port::engine::{EngineFactory, MimeHint};
use crate::diagnostics::{
    DiagnosticsCollector, DiagnosticsHandle, ErrorEvent, PlaybackStateEvent, UserAction, WarningEvent, WarningType,
};
use crate::domain::error::PlayerError;
use crate::domain::video::{PlaybackMode, PlaybackState};
use crate::player::controls;
use crate::player::indicator::SeekIndicator;
use crate::player::input::{Focus, TransportCommand, TransportInputMapper};
use crate::player::settings::TransportSettings;
use crate::player::state::{AttachOutcome, Change, PlaybackSession, PlaybackStateMachine};
use crate::player::time_units::format_time;
use iced::keyboard::{Key, Modifiers};
use iced::{Point, Rectangle};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Status key emitted when autoplay only succeeded muted.
pub const STATUS_AUTOPLAY_MUTED: &str = "player-status-autoplay-muted";
/// Status key emitted when a user play request was refused.
pub const STATUS_PLAY_REJECTED: &str = "player-status-play-rejected";

#[derive(Debug, Clone)]
pub enum Message {
    Attach(String),
    Detach,
    /// Tear down the current engine and attach a new source.
    Reattach(String),
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
        focus: Focus,
    },
    /// Primary button pressed; starts a scrub when `position` is on `track`.
    TrackPressed {
        position: Point,
        track: Rectangle,
    },
    PointerMoved(Point),
    PointerReleased,
    PointerLeft,
    Command(TransportCommand),
    SetVolume(f32),
    SelectQualityAuto,
    SelectQuality(usize),
    ToggleQualityMenu,
    CloseQualityMenu,
    /// Drains engine events and advances both timers.
    Tick,
}

/// Requests and notifications for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ToggleFullscreen,
    StateChanged(PlaybackState),
    /// The session entered `Error`. Emitted once per failure.
    PlaybackFailed(PlayerError),
    /// A stable key the host maps to a user-facing message.
    StatusChanged(&'static str),
    QualitiesChanged,
    VolumeChanged,
    ControlsVisibility(bool),
    /// Seek indicator text, or `None` once it expires.
    SeekIndicator(Option<String>),
}

/// The time label next to the transport bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeReadout {
    /// A live stream at its edge.
    Live,
    Position { current: f64, total: f64 },
}

impl fmt::Display for TimeReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("LIVE"),
            Self::Position { current, total } => {
                write!(f, "{} / {}", format_time(*current), format_time(*total))
            }
        }
    }
}

/// One mounted player.
#[derive(Debug)]
pub struct PlaybackController {
    machine: PlaybackStateMachine,
    controls: controls::State,
    indicator: SeekIndicator,
    input: TransportInputMapper,
    diagnostics: Option<DiagnosticsHandle>,
    /// Present when diagnostics are enabled in the settings and no external
    /// handle replaced it.
    collector: Option<DiagnosticsCollector>,
}

impl PlaybackController {
    #[must_use]
    pub fn new(settings: TransportSettings, factory: Box<dyn EngineFactory>) -> Self {
        let collector = settings
            .diagnostics_enabled
            .then(|| DiagnosticsCollector::new(settings.diagnostics_capacity));
        Self {
            machine: PlaybackStateMachine::new(settings.mode, settings.session, factory),
            controls: controls::State::new(settings.controls_timeout),
            indicator: SeekIndicator::default(),
            input: TransportInputMapper::new(settings.short_step, settings.long_step),
            diagnostics: collector.as_ref().map(DiagnosticsCollector::handle),
            collector,
        }
    }

    /// Reports to an externally owned collector instead of the built-in one.
    #[must_use]
    pub fn with_diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self.collector = None;
        self
    }

    /// Applies a message and returns the resulting effects.
    pub fn update(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::Attach(url) => self.attach(&url, false, &mut effects),
            Message::Detach => {
                if self.machine.is_attached() {
                    self.log_action(UserAction::Detach);
                }
                self.machine.detach();
            }
            Message::Reattach(url) => self.attach(&url, true, &mut effects),
            Message::KeyPressed {
                key,
                modifiers,
                focus,
            } => {
                if let Some(command) = self.input.map_key(&key, modifiers, focus) {
                    self.execute(command, now, &mut effects);
                }
            }
            Message::TrackPressed { position, track } => {
                if self.machine.is_attached() {
                    if let Some(fraction) = self.input.press(position, track) {
                        self.machine.set_dragging(true);
                        self.push_controls(
                            controls::Message::DraggingChanged {
                                dragging: true,
                                now,
                            },
                            &mut effects,
                        );
                        self.log_action(UserAction::ScrubStart);
                        self.scrub_to(fraction);
                    }
                }
            }
            Message::PointerMoved(position) => {
                self.push_controls(controls::Message::PointerMoved(now), &mut effects);
                if let Some(fraction) = self.input.pointer_moved(position) {
                    self.scrub_to(fraction);
                }
            }
            Message::PointerReleased => {
                if self.input.release() {
                    self.machine.set_dragging(false);
                    self.push_controls(
                        controls::Message::DraggingChanged {
                            dragging: false,
                            now,
                        },
                        &mut effects,
                    );
                    self.log_action(UserAction::ScrubEnd {
                        position_secs: self.machine.current_time(),
                    });
                }
            }
            Message::PointerLeft => {
                self.push_controls(controls::Message::PointerLeft, &mut effects);
            }
            Message::Command(command) => self.execute(command, now, &mut effects),
            Message::SetVolume(volume) => {
                self.machine.set_volume(volume);
                self.log_action(UserAction::SetVolume {
                    volume: self.machine.volume().value(),
                });
            }
            Message::SelectQualityAuto => {
                self.machine.select_quality_auto();
                self.log_action(UserAction::SelectQuality {
                    label: self.machine.quality().selection_label(),
                });
            }
            Message::SelectQuality(id) => match self.machine.select_quality(id) {
                Ok(()) => self.log_action(UserAction::SelectQuality {
                    label: self.machine.quality().selection_label(),
                }),
                Err(err) => {
                    self.log_warning(WarningType::StaleQualitySelection, err.to_string());
                    effects.push(Effect::StatusChanged(err.status_key()));
                }
            },
            Message::ToggleQualityMenu => self.machine.toggle_quality_menu(),
            Message::CloseQualityMenu => self.machine.close_quality_menu(),
            Message::Tick => return self.tick(now),
        }
        self.drain_changes(now, &mut effects);
        effects
    }

    /// Applies pending engine events.
    pub fn pump(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.machine.pump();
        self.drain_changes(now, &mut effects);
        effects
    }

    /// Applies pending engine events, expires timers and files queued
    /// diagnostics into the built-in collector.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = self.pump(now);
        self.push_controls(controls::Message::Tick(now), &mut effects);
        if self.indicator.tick(now) {
            effects.push(Effect::SeekIndicator(None));
        }
        if let Some(collector) = self.collector.as_mut() {
            collector.process_pending();
        }
        effects
    }

    /// Writes the built-in collector's report to `path`.
    ///
    /// Returns `Ok(None)` when diagnostics are disabled or routed to an
    /// external handle.
    ///
    /// # Errors
    ///
    /// Propagates [`DiagnosticsCollector::export_to_file`] failures.
    pub fn export_diagnostics(
        &mut self,
        path: impl AsRef<Path>,
    ) -> crate::error::Result<Option<PathBuf>> {
        let Some(collector) = self.collector.as_mut() else {
            return Ok(None);
        };
        collector.process_pending();
        collector.export_to_file(path).map(Some)
    }

    fn attach(&mut self, url: &str, reattach: bool, effects: &mut Vec<Effect>) {
        self.log_action(UserAction::Attach {
            mime: MimeHint::from_url(url).as_str().to_string(),
        });
        let result = if reattach {
            self.machine.reattach(url)
        } else {
            self.machine.attach(url)
        };
        match result {
            Ok(AttachOutcome::AlreadyAttached) => {
                debug!("ignoring attach while an engine is attached");
            }
            Ok(AttachOutcome::Attached | AttachOutcome::Failed) => {}
            Err(err) => {
                self.log_error(&err);
                effects.push(Effect::StatusChanged(err.status_key()));
            }
        }
    }

    fn execute(&mut self, command: TransportCommand, now: Instant, effects: &mut Vec<Effect>) {
        match command {
            TransportCommand::TogglePlay => {
                self.log_action(UserAction::TogglePlayback);
                self.machine.toggle_play();
            }
            TransportCommand::SeekRelative(delta) => {
                if self.seek_logged(|m| m.seek_relative(delta)) {
                    if let Some(text) = command.indicator_text() {
                        self.indicator.show(text.clone(), now);
                        effects.push(Effect::SeekIndicator(Some(text)));
                    }
                }
            }
            TransportCommand::SeekToFraction(fraction) => {
                self.seek_logged(|m| m.seek_to_fraction(fraction));
            }
            TransportCommand::SeekToStart => {
                self.seek_logged(PlaybackStateMachine::seek_to_start);
            }
            TransportCommand::SeekToEnd => {
                self.seek_logged(PlaybackStateMachine::seek_to_end);
            }
            TransportCommand::VolumeUp | TransportCommand::VolumeDown => {
                self.machine
                    .step_volume(command == TransportCommand::VolumeUp);
                self.log_action(UserAction::SetVolume {
                    volume: self.machine.volume().value(),
                });
            }
            TransportCommand::ToggleMute => {
                self.log_action(UserAction::ToggleMute);
                self.machine.toggle_mute();
            }
            TransportCommand::ToggleFullscreen => {
                self.log_action(UserAction::ToggleFullscreen);
                effects.push(Effect::ToggleFullscreen);
            }
        }
    }

    /// Runs a seek and logs it. Returns false if no engine is attached.
    fn seek_logged<F>(&mut self, seek: F) -> bool
    where
        F: FnOnce(&mut PlaybackStateMachine) -> Result<f64, PlayerError>,
    {
        match seek(&mut self.machine) {
            Ok(position_secs) => {
                self.log_action(UserAction::Seek { position_secs });
                true
            }
            Err(err) => {
                debug!("seek ignored: {err}");
                false
            }
        }
    }

    fn scrub_to(&mut self, fraction: f64) {
        if let Err(err) = self.machine.seek_to_fraction(fraction) {
            debug!("scrub ignored: {err}");
        }
    }

    fn push_controls(&mut self, message: controls::Message, effects: &mut Vec<Effect>) {
        if let controls::Effect::VisibilityChanged(visible) = self.controls.handle(message) {
            effects.push(Effect::ControlsVisibility(visible));
        }
    }

    fn drain_changes(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        for change in self.machine.take_changes() {
            match change {
                Change::Attached { url, mime } => {
                    debug!("controller attached {mime} source {url}");
                }
                Change::Detached => {
                    let was_hidden = !self.controls.is_visible();
                    self.controls.clear();
                    self.input.release();
                    if was_hidden {
                        effects.push(Effect::ControlsVisibility(true));
                    }
                    if self.indicator.is_visible() {
                        self.indicator.clear();
                        effects.push(Effect::SeekIndicator(None));
                    }
                }
                Change::StateChanged { from, to } => {
                    self.log_state(PlaybackStateEvent::Transition { from, to });
                    self.push_controls(
                        controls::Message::PlaybackChanged {
                            playing: to.is_playing(),
                            now,
                        },
                        effects,
                    );
                    effects.push(Effect::StateChanged(to));
                }
                Change::SnappedToLiveEdge(position_secs) => {
                    self.log_state(PlaybackStateEvent::SnappedToLiveEdge { position_secs });
                }
                Change::StartPositionApplied(secs) => {
                    debug!("applied start position {secs:.1}s");
                }
                Change::VolumeChanged => push_unique(effects, Effect::VolumeChanged),
                Change::QualitiesChanged => push_unique(effects, Effect::QualitiesChanged),
                Change::AutoplayRetried(reason) => {
                    self.log_state(PlaybackStateEvent::AutoplayRetried);
                    self.log_warning(WarningType::AutoplayRejected, reason);
                    effects.push(Effect::StatusChanged(STATUS_AUTOPLAY_MUTED));
                }
                Change::PlayRejected(reason) => {
                    self.log_warning(WarningType::PlayRejected, reason);
                    effects.push(Effect::StatusChanged(STATUS_PLAY_REJECTED));
                }
                Change::Failed(err) => {
                    self.log_error(&err);
                    effects.push(Effect::StatusChanged(err.status_key()));
                    effects.push(Effect::PlaybackFailed(err));
                }
            }
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn log_action(&self, action: UserAction) {
        if let Some(handle) = &self.diagnostics {
            handle.log_action(action);
        }
    }

    fn log_state(&self, event: PlaybackStateEvent) {
        if let Some(handle) = &self.diagnostics {
            handle.log_state(event);
        }
    }

    fn log_warning(&self, warning_type: WarningType, message: String) {
        if let Some(handle) = &self.diagnostics {
            handle.log_warning(WarningEvent::new(warning_type, message));
        }
    }

    fn log_error(&self, err: &PlayerError) {
        if let Some(handle) = &self.diagnostics {
            handle.log_error(ErrorEvent::from(err));
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Render snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> PlaybackSession {
        self.machine.session(self.controls.is_visible())
    }

    #[must_use]
    pub fn time_readout(&self) -> TimeReadout {
        let ranges = self.machine.ranges();
        if ranges.is_live() {
            TimeReadout::Live
        } else {
            TimeReadout::Position {
                current: ranges.current_time(),
                total: ranges.seekable_end(),
            }
        }
    }

    #[must_use]
    pub fn machine(&self) -> &PlaybackStateMachine {
        &self.machine
    }

    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.machine.mode()
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    /// Built-in event log, if diagnostics are enabled.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&DiagnosticsCollector> {
        self.collector.as_ref()
    }

    #[must_use]
    pub fn seek_indicator(&self) -> Option<&str> {
        self.indicator.text()
    }

    /// Whether a host must keep delivering [`Message::Tick`].
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.machine.is_attached() || self.controls.is_armed() || self.indicator.is_visible()
    }
}

fn push_unique(effects: &mut Vec<Effect>, effect: Effect) {
    if !effects.contains(&effect) {
        effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::engine::EngineEvent;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};
    use crate::domain::diagnostics::BufferCapacity;
    use crate::infrastructure::simulated::{
        AutoplayPolicy, SimulatedEngineFactory, SimulatedEngineHandle,
    };
    use crate::test_utils::assert_abs_diff_eq;
    use iced::keyboard::key::Named;
    use std::time::Duration;

    fn controller(mode: PlaybackMode, policy: AutoplayPolicy) -> (PlaybackController, SimulatedEngineFactory) {
        let factory = SimulatedEngineFactory::new(policy);
        let controller = PlaybackController::new(TransportSettings::new(mode), Box::new(factory.clone()));
        (controller, factory)
    }

    fn playing_vod(duration: f64, now: Instant) -> (PlaybackController, SimulatedEngineHandle) {
        let (mut c, factory) = controller(PlaybackMode::OnDemand, AutoplayPolicy::Allow);
        c.update(Message::Attach("https://cdn/movie.mp4".into()), now);
        let engine = factory.latest().expect("engine created");
        engine.set_seekable(0.0, duration);
        engine.set_duration(duration);
        engine.load_metadata();
        c.tick(now);
        (c, engine)
    }

    fn key(c: &mut PlaybackController, key: Key, now: Instant) -> Vec<Effect> {
        c.update(
            Message::KeyPressed {
                key,
                modifiers: Modifiers::default(),
                focus: Focus::Player,
            },
            now,
        )
    }

    fn track() -> Rectangle {
        Rectangle::new(Point::new(100.0, 500.0), iced::Size::new(200.0, 10.0))
    }

    #[test]
    fn arrow_seek_shows_indicator_then_expires() {
        let now = Instant::now();
        let (mut c, engine) = playing_vod(100.0, now);
        engine.tick(20.0);
        c.tick(now);

        let effects = key(&mut c, Key::Named(Named::ArrowRight), now);
        assert!(effects.contains(&Effect::SeekIndicator(Some("+5s".into()))));
        assert_eq!(engine.seeks().last().copied(), Some(25.0));
        assert_eq!(c.seek_indicator(), Some("+5s"));

        let effects = c.tick(now + Duration::from_millis(499));
        assert!(!effects.contains(&Effect::SeekIndicator(None)));
        let effects = c.tick(now + Duration::from_millis(500));
        assert!(effects.contains(&Effect::SeekIndicator(None)));
        assert!(c.seek_indicator().is_none());
    }

    #[test]
    fn digit_keys_seek_to_fraction_without_indicator() {
        let now = Instant::now();
        let (mut c, engine) = playing_vod(200.0, now);
        let effects = key(&mut c, Key::Character("3".into()), now);
        assert_abs_diff_eq!(engine.seeks().last().copied().unwrap_or_default(), 60.0, epsilon = 1e-9);
        assert!(effects.iter().all(|e| !matches!(e, Effect::SeekIndicator(_))));
    }

    #[test]
    fn fullscreen_is_delegated_to_host() {
        let now = Instant::now();
        let (mut c, _) = playing_vod(10.0, now);
        assert_eq!(key(&mut c, Key::Character("f".into()), now), vec![Effect::ToggleFullscreen]);
    }

    #[test]
    fn keys_before_attach_do_nothing() {
        let (mut c, factory) = controller(PlaybackMode::Live, AutoplayPolicy::Allow);
        let effects = key(&mut c, Key::Named(Named::ArrowLeft), Instant::now());
        assert!(effects.is_empty());
        assert_eq!(factory.created_count(), 0);
    }

    #[test]
    fn controls_hide_after_timeout_while_playing() {
        let now = Instant::now();
        let (mut c, _) = playing_vod(60.0, now);
        assert_eq!(c.session().state, PlaybackState::Playing);
        assert!(c.controls_visible());

        c.update(Message::PointerMoved(Point::new(10.0, 10.0)), now);
        let effects = c.tick(now + Duration::from_millis(2_999));
        assert!(effects.is_empty());
        let effects = c.tick(now + Duration::from_millis(3_000));
        assert_eq!(effects, vec![Effect::ControlsVisibility(false)]);
        assert!(!c.session().controls_visible);
    }

    #[test]
    fn pausing_forces_controls_visible() {
        let now = Instant::now();
        let (mut c, _) = playing_vod(60.0, now);
        c.update(Message::PointerLeft, now);
        assert!(!c.controls_visible());

        key(&mut c, Key::Named(Named::Space), now);
        let effects = c.tick(now);
        assert!(effects.contains(&Effect::StateChanged(PlaybackState::Paused)));
        assert!(effects.contains(&Effect::ControlsVisibility(true)));
    }

    #[test]
    fn scrub_drag_seeks_and_pins_position() {
        let now = Instant::now();
        let (mut c, engine) = playing_vod(100.0, now);

        let effects = c.update(
            Message::TrackPressed {
                position: Point::new(150.0, 505.0),
                track: track(),
            },
            now,
        );
        assert!(effects.iter().all(|e| *e != Effect::ControlsVisibility(false)));
        assert!(c.session().is_dragging);
        assert_eq!(engine.seeks().last().copied(), Some(25.0));

        c.update(Message::PointerMoved(Point::new(400.0, 0.0)), now);
        assert_eq!(engine.seeks().last().copied(), Some(100.0));

        engine.tick(3.0);
        c.tick(now);
        assert_abs_diff_eq!(c.session().current_time, 100.0);

        c.update(Message::PointerReleased, now);
        assert!(!c.session().is_dragging);
        engine.tick(3.0);
        c.tick(now);
        assert_abs_diff_eq!(c.session().current_time, 3.0);
    }

    #[test]
    fn press_outside_track_does_not_scrub() {
        let now = Instant::now();
        let (mut c, engine) = playing_vod(100.0, now);
        let seeks = engine.seeks().len();
        c.update(
            Message::TrackPressed {
                position: Point::new(50.0, 50.0),
                track: track(),
            },
            now,
        );
        assert!(!c.session().is_dragging);
        assert_eq!(engine.seeks().len(), seeks);
    }

    #[test]
    fn failure_is_reported_once() {
        let now = Instant::now();
        let (mut c, engine) = playing_vod(60.0, now);
        engine.fail("network");
        engine.fail("again");
        let effects = c.tick(now);
        let failures: Vec<_> = effects
            .iter()
            .filter(|e| matches!(e, Effect::PlaybackFailed(_)))
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(effects.contains(&Effect::StatusChanged("player-error-playback")));
        assert!(effects.contains(&Effect::ControlsVisibility(true)) || c.controls_visible());

        engine.emit(EngineEvent::Error("later".into()));
        assert!(c.tick(now).iter().all(|e| !matches!(e, Effect::PlaybackFailed(_))));
    }

    #[test]
    fn muted_autoplay_retry_surfaces_status() {
        let (mut c, _) = controller(PlaybackMode::Live, AutoplayPolicy::RequireMuted);
        let now = Instant::now();
        c.update(Message::Attach("https://cdn/live.m3u8".into()), now);
        let effects = c.tick(now);
        assert!(effects.contains(&Effect::StatusChanged(STATUS_AUTOPLAY_MUTED)));
        assert!(c.session().muted);
    }

    #[test]
    fn empty_url_surfaces_attach_status() {
        let (mut c, _) = controller(PlaybackMode::OnDemand, AutoplayPolicy::Allow);
        let effects = c.update(Message::Attach(String::new()), Instant::now());
        assert_eq!(effects, vec![Effect::StatusChanged("player-error-attach")]);
    }

    #[test]
    fn stale_quality_selection_surfaces_status() {
        let now = Instant::now();
        let (mut c, _) = playing_vod(60.0, now);
        let effects = c.update(Message::SelectQuality(4), now);
        assert_eq!(effects, vec![Effect::StatusChanged("player-error-stale-quality")]);
    }

    #[test]
    fn detach_clears_timers() {
        let now = Instant::now();
        let (mut c, engine) = playing_vod(60.0, now);
        c.update(Message::PointerLeft, now);
        key(&mut c, Key::Character("l".into()), now);
        assert!(c.seek_indicator().is_some());

        let effects = c.update(Message::Detach, now);
        assert!(effects.contains(&Effect::ControlsVisibility(true)));
        assert!(effects.contains(&Effect::SeekIndicator(None)));
        assert!(c.seek_indicator().is_none());
        assert!(engine.is_disposed());
        assert!(!c.needs_tick());
    }

    #[test]
    fn readout_shows_live_at_edge() {
        let (mut c, factory) = controller(PlaybackMode::Live, AutoplayPolicy::Allow);
        let now = Instant::now();
        c.update(Message::Attach("https://cdn/live.m3u8".into()), now);
        let engine = factory.latest().expect("engine created");
        engine.set_seekable(0.0, 120.0);
        engine.load_metadata();
        c.tick(now);
        assert_eq!(c.time_readout(), TimeReadout::Live);
        assert_eq!(c.time_readout().to_string(), "LIVE");

        key(&mut c, Key::Character("j".into()), now);
        assert_eq!(c.time_readout().to_string(), "1:48 / 2:00");
    }

    fn settings_with_diagnostics(enabled: bool) -> TransportSettings {
        let mut cfg = crate::config::Config::default();
        cfg.diagnostics.enabled = Some(enabled);
        cfg.diagnostics.buffer_capacity = Some(32);
        TransportSettings::from_config(&cfg, PlaybackMode::OnDemand)
    }

    #[test]
    fn enabled_diagnostics_are_collected_on_tick() {
        let factory = SimulatedEngineFactory::new(AutoplayPolicy::Allow);
        let mut c = PlaybackController::new(settings_with_diagnostics(true), Box::new(factory));
        let now = Instant::now();
        assert_eq!(c.diagnostics().map(DiagnosticsCollector::capacity), Some(32));

        c.update(Message::Attach("https://cdn/a.mp4".into()), now);
        assert_eq!(c.diagnostics().map(DiagnosticsCollector::len), Some(0));
        c.tick(now);
        assert!(c.diagnostics().is_some_and(|d| !d.is_empty()));

        let dir = tempfile::tempdir().expect("temp dir");
        let path = c
            .export_diagnostics(dir.path().join("session.json"))
            .expect("export succeeds");
        assert!(path.is_some_and(|p| p.exists()));
    }

    #[test]
    fn disabled_diagnostics_record_nothing() {
        let factory = SimulatedEngineFactory::new(AutoplayPolicy::Allow);
        let mut c = PlaybackController::new(
            settings_with_diagnostics(false),
            Box::new(factory.clone()),
        );
        let now = Instant::now();

        c.update(Message::Attach("https://cdn/a.mp4".into()), now);
        factory.latest().expect("engine created").load_metadata();
        c.tick(now);
        key(&mut c, Key::Character("m".into()), now);
        c.tick(now);

        assert!(c.diagnostics().is_none());
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("session.json");
        assert!(matches!(c.export_diagnostics(&target), Ok(None)));
        assert!(!target.exists());
    }

    #[test]
    fn external_handle_replaces_builtin_collector() {
        let collector = DiagnosticsCollector::new(BufferCapacity::default());
        let c = PlaybackController::new(
            settings_with_diagnostics(true),
            Box::new(SimulatedEngineFactory::new(AutoplayPolicy::Allow)),
        )
        .with_diagnostics(collector.handle());
        assert!(c.diagnostics().is_none());
    }

    #[test]
    fn actions_reach_diagnostics() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let factory = SimulatedEngineFactory::new(AutoplayPolicy::Allow);
        let mut c = PlaybackController::new(
            TransportSettings::new(PlaybackMode::OnDemand),
            Box::new(factory.clone()),
        )
        .with_diagnostics(collector.handle());
        let now = Instant::now();

        c.update(Message::Attach("https://cdn/a.mp4".into()), now);
        factory.latest().expect("engine created").load_metadata();
        c.tick(now);
        key(&mut c, Key::Character("m".into()), now);

        collector.process_pending();
        let kinds: Vec<_> = collector.iter().map(|e| e.kind.clone()).collect();
        assert!(kinds.contains(&DiagnosticEventKind::UserAction {
            action: UserAction::Attach { mime: "video/mp4".into() },
            details: None,
        }));
        assert!(kinds.contains(&DiagnosticEventKind::UserAction {
            action: UserAction::ToggleMute,
            details: None,
        }));
        assert!(kinds
            .iter()
            .any(|k| matches!(k, DiagnosticEventKind::PlaybackState { .. })));
    }
}
