// SPDX-License-Identifier: MPL-2.0
//! Playback transport components.
//!
//! Leaf-first:
//!
//! - [`ranges`]: seekable/buffered window and live-edge detection
//! - [`quality`]: quality level catalog and Auto/Manual selection
//! - [`state`]: engine session and playback state machine
//! - [`input`]: keyboard shortcuts and scrub drag mapping
//! - [`controls`]: controls auto-hide timer
//! - [`indicator`]: transient seek feedback
//! - [`controller`]: ties the above together behind `update(message, now)`

pub mod controller;
pub mod controls;
pub mod indicator;
pub mod input;
pub mod quality;
pub mod ranges;
pub mod settings;
pub mod state;
pub mod subscription;
pub mod time_units;

pub use controller::{Effect, Message, PlaybackController, TimeReadout};
pub use input::{Focus, TransportCommand, TransportInputMapper};
pub use quality::QualityCatalog;
pub use ranges::RangeTracker;
pub use settings::TransportSettings;
pub use state::{AttachOutcome, PlaybackSession, PlaybackStateMachine, SessionOptions};
pub use subscription::tick_subscription;
