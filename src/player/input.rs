// SPDX-License-Identifier: MPL-2.0
//! Keyboard and pointer input mapping for the transport.
//!
//! [`TransportInputMapper`] turns raw `iced` keyboard events into
//! [`TransportCommand`]s and tracks the scrub drag on the progress track.
//! It never talks to the engine: the controller resolves commands against
//! the current seekable window.

use crate::domain::video::KeyboardSeekStep;
use crate::player::time_units::format_seek_delta;
use iced::keyboard::{key::Named, Key, Modifiers};
use iced::{Point, Rectangle};

/// Where keyboard focus currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The player or any non-editable element.
    #[default]
    Player,
    /// An editable text field. Transport shortcuts are suspended.
    TextInput,
}

/// A transport action requested by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    TogglePlay,
    /// Seek relative to the current position, in seconds.
    SeekRelative(f64),
    /// Seek to a fraction `[0, 1]` of the seekable window.
    SeekToFraction(f64),
    /// Seek to the start of the window (`0` for on-demand).
    SeekToStart,
    /// Seek one second before the end of the window.
    SeekToEnd,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleFullscreen,
}

impl TransportCommand {
    /// Text shown by the seek indicator, for relative seeks only.
    #[must_use]
    pub fn indicator_text(&self) -> Option<String> {
        match self {
            Self::SeekRelative(delta) => Some(format_seek_delta(*delta)),
            _ => None,
        }
    }
}

/// Maps a pointer x coordinate to a `[0, 1]` fraction of the track.
///
/// A track without width maps everything to `0`.
#[must_use]
pub fn track_fraction(track: Rectangle, x: f32) -> f64 {
    if track.width <= 0.0 {
        return 0.0;
    }
    f64::from(((x - track.x) / track.width).clamp(0.0, 1.0))
}

/// Scrub drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrubState {
    /// Whether a scrub drag is active.
    pub is_dragging: bool,
    /// Track bounds captured when the drag started.
    pub track: Option<Rectangle>,
}

impl ScrubState {
    /// Starts a drag if `position` is on the track.
    ///
    /// Returns the fraction to seek to.
    pub fn press(&mut self, position: Point, track: Rectangle) -> Option<f64> {
        if !track.contains(position) {
            return None;
        }
        self.is_dragging = true;
        self.track = Some(track);
        Some(track_fraction(track, position.x))
    }

    /// Follows a global pointer move while dragging.
    #[must_use]
    pub fn moved(&self, position: Point) -> Option<f64> {
        if !self.is_dragging {
            return None;
        }
        let track = self.track?;
        Some(track_fraction(track, position.x))
    }

    /// Ends the drag. Returns true if one was active.
    pub fn release(&mut self) -> bool {
        let was_dragging = self.is_dragging;
        self.is_dragging = false;
        self.track = None;
        was_dragging
    }
}

/// Keyboard shortcut table plus scrub state.
#[derive(Debug, Clone)]
pub struct TransportInputMapper {
    short_step: KeyboardSeekStep,
    long_step: KeyboardSeekStep,
    scrub: ScrubState,
}

impl Default for TransportInputMapper {
    fn default() -> Self {
        Self::new(KeyboardSeekStep::default(), KeyboardSeekStep::long())
    }
}

impl TransportInputMapper {
    #[must_use]
    pub fn new(short_step: KeyboardSeekStep, long_step: KeyboardSeekStep) -> Self {
        Self {
            short_step,
            long_step,
            scrub: ScrubState::default(),
        }
    }

    /// Maps a key press to a transport command.
    ///
    /// Returns `None` for unbound keys, while a text field has focus, and
    /// when the command or alt modifier is held.
    #[must_use]
    pub fn map_key(&self, key: &Key, modifiers: Modifiers, focus: Focus) -> Option<TransportCommand> {
        if focus == Focus::TextInput || modifiers.command() || modifiers.alt() {
            return None;
        }
        let short = self.short_step.value();
        let long = self.long_step.value();

        match key {
            Key::Named(Named::Space) => Some(TransportCommand::TogglePlay),
            Key::Named(Named::ArrowLeft) => Some(TransportCommand::SeekRelative(-short)),
            Key::Named(Named::ArrowRight) => Some(TransportCommand::SeekRelative(short)),
            Key::Named(Named::ArrowUp) => Some(TransportCommand::VolumeUp),
            Key::Named(Named::ArrowDown) => Some(TransportCommand::VolumeDown),
            Key::Named(Named::Home) => Some(TransportCommand::SeekToStart),
            Key::Named(Named::End) => Some(TransportCommand::SeekToEnd),
            Key::Character(c) => match c.as_str() {
                " " | "k" | "K" => Some(TransportCommand::TogglePlay),
                "j" | "J" => Some(TransportCommand::SeekRelative(-long)),
                "l" | "L" => Some(TransportCommand::SeekRelative(long)),
                "m" | "M" => Some(TransportCommand::ToggleMute),
                "f" | "F" => Some(TransportCommand::ToggleFullscreen),
                other => digit_fraction(other).map(TransportCommand::SeekToFraction),
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn scrub(&self) -> &ScrubState {
        &self.scrub
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.scrub.is_dragging
    }

    /// Pointer pressed. Returns the fraction to seek to if on the track.
    pub fn press(&mut self, position: Point, track: Rectangle) -> Option<f64> {
        self.scrub.press(position, track)
    }

    /// Pointer moved anywhere. Returns the fraction to seek to while dragging.
    #[must_use]
    pub fn pointer_moved(&self, position: Point) -> Option<f64> {
        self.scrub.moved(position)
    }

    /// Pointer released. Returns true if a drag ended.
    pub fn release(&mut self) -> bool {
        self.scrub.release()
    }
}

fn digit_fraction(s: &str) -> Option<f64> {
    let mut chars = s.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    Some(f64::from(digit) * 0.1)
}
