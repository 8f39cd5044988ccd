// SPDX-License-Identifier: MPL-2.0
//! Controls auto-hide sub-component.
//!
//! Controls are always visible unless media is playing and the user is not
//! scrubbing. While playing, pointer activity shows them and restarts the
//! hide deadline; they disappear when the deadline passes or the pointer
//! leaves the player.

use crate::domain::ui::OverlayTimeout;
use std::time::{Duration, Instant};

/// Controls visibility state.
#[derive(Debug, Clone)]
pub struct State {
    visible: bool,
    deadline: Option<Instant>,
    timeout: Duration,
    playing: bool,
    dragging: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new(OverlayTimeout::default())
    }
}

/// Messages for the controls sub-component.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    /// Pointer moved over the player.
    PointerMoved(Instant),
    /// Pointer left the player.
    PointerLeft,
    /// Playback started (`true`) or stopped for any reason (`false`).
    PlaybackChanged { playing: bool, now: Instant },
    /// Scrubbing started or ended.
    DraggingChanged { dragging: bool, now: Instant },
    /// Periodic check of the hide deadline.
    Tick(Instant),
}

/// Effects produced by visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    VisibilityChanged(bool),
}

impl State {
    #[must_use]
    pub fn new(timeout: OverlayTimeout) -> Self {
        Self {
            visible: true,
            deadline: None,
            timeout: timeout.as_duration(),
            playing: false,
            dragging: false,
        }
    }

    /// Handle a controls message.
    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::PointerMoved(now) => {
                self.deadline = Some(now + self.timeout);
                self.show()
            }
            Message::PointerLeft => {
                if self.may_hide() {
                    self.deadline = None;
                    self.hide()
                } else {
                    Effect::None
                }
            }
            Message::PlaybackChanged { playing, now } => {
                self.playing = playing;
                if playing {
                    self.arm(now);
                    Effect::None
                } else {
                    self.deadline = None;
                    self.show()
                }
            }
            Message::DraggingChanged { dragging, now } => {
                self.dragging = dragging;
                if dragging {
                    self.deadline = None;
                    self.show()
                } else {
                    self.arm(now);
                    Effect::None
                }
            }
            Message::Tick(now) => match self.deadline {
                Some(deadline) if now >= deadline => {
                    self.deadline = None;
                    if self.may_hide() {
                        self.hide()
                    } else {
                        Effect::None
                    }
                }
                _ => Effect::None,
            },
        }
    }

    /// Cancels the pending deadline and shows the controls.
    pub fn clear(&mut self) {
        self.deadline = None;
        self.playing = false;
        self.dragging = false;
        self.visible = true;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a hide deadline is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    fn may_hide(&self) -> bool {
        self.playing && !self.dragging
    }

    fn arm(&mut self, now: Instant) {
        if self.may_hide() && self.visible && self.deadline.is_none() {
            self.deadline = Some(now + self.timeout);
        }
    }

    fn show(&mut self) -> Effect {
        if self.visible {
            Effect::None
        } else {
            self.visible = true;
            Effect::VisibilityChanged(true)
        }
    }

    fn hide(&mut self) -> Effect {
        if self.visible {
            self.visible = false;
            Effect::VisibilityChanged(false)
        } else {
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state(now: Instant) -> State {
        let mut state = State::default();
        state.handle(Message::PlaybackChanged { playing: true, now });
        state
    }

    #[test]
    fn hides_after_timeout_while_playing() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);

        state.handle(Message::PointerMoved(t0));
        assert_eq!(
            state.handle(Message::Tick(t0 + Duration::from_millis(2_999))),
            Effect::None
        );
        assert!(state.is_visible());

        let effect = state.handle(Message::Tick(t0 + Duration::from_millis(3_000)));
        assert_eq!(effect, Effect::VisibilityChanged(false));
        assert!(!state.is_visible());
    }

    #[test]
    fn pointer_move_restarts_timer() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);

        state.handle(Message::PointerMoved(t0));
        state.handle(Message::PointerMoved(t0 + Duration::from_secs(2)));
        state.handle(Message::Tick(t0 + Duration::from_millis(4_000)));
        assert!(state.is_visible());

        state.handle(Message::Tick(t0 + Duration::from_millis(5_000)));
        assert!(!state.is_visible());
    }

    #[test]
    fn starting_playback_arms_the_deadline() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);
        assert!(state.is_armed());
        state.handle(Message::Tick(t0 + Duration::from_secs(3)));
        assert!(!state.is_visible());
    }

    #[test]
    fn never_hides_while_paused() {
        let t0 = Instant::now();
        let mut state = State::default();
        state.handle(Message::PointerMoved(t0));
        state.handle(Message::Tick(t0 + Duration::from_secs(10)));
        assert!(state.is_visible());

        assert_eq!(state.handle(Message::PointerLeft), Effect::None);
        assert!(state.is_visible());
    }

    #[test]
    fn never_hides_while_dragging() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);
        state.handle(Message::DraggingChanged { dragging: true, now: t0 });
        state.handle(Message::PointerMoved(t0));
        state.handle(Message::Tick(t0 + Duration::from_secs(10)));
        state.handle(Message::PointerLeft);
        assert!(state.is_visible());
    }

    #[test]
    fn drag_end_rearms_the_deadline() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);
        state.handle(Message::DraggingChanged { dragging: true, now: t0 });
        assert!(!state.is_armed());

        let t1 = t0 + Duration::from_secs(1);
        state.handle(Message::DraggingChanged { dragging: false, now: t1 });
        assert!(state.is_armed());
        state.handle(Message::Tick(t1 + Duration::from_secs(3)));
        assert!(!state.is_visible());
    }

    #[test]
    fn pointer_leave_hides_immediately_when_playing() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);
        let effect = state.handle(Message::PointerLeft);
        assert_eq!(effect, Effect::VisibilityChanged(false));
    }

    #[test]
    fn pausing_forces_visible() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);
        state.handle(Message::PointerLeft);
        assert!(!state.is_visible());

        let effect = state.handle(Message::PlaybackChanged {
            playing: false,
            now: t0,
        });
        assert_eq!(effect, Effect::VisibilityChanged(true));
        assert!(!state.is_armed());
    }

    #[test]
    fn custom_timeout_is_respected() {
        let t0 = Instant::now();
        let mut state = State::new(OverlayTimeout::new(1_000));
        state.handle(Message::PlaybackChanged { playing: true, now: t0 });
        state.handle(Message::Tick(t0 + Duration::from_millis(1_000)));
        assert!(!state.is_visible());
    }

    #[test]
    fn clear_cancels_deadline() {
        let t0 = Instant::now();
        let mut state = playing_state(t0);
        state.clear();
        assert!(!state.is_armed());
        assert!(state.is_visible());
    }
}
