// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core playback types with no framework dependencies.
//!
//! This module contains pure value objects and state enums shared by the
//! player components and the engine port.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`error`]: Domain error types ([`PlayerError`](error::PlayerError))
//! - [`ui`]: UI value objects ([`OverlayTimeout`](ui::OverlayTimeout))
//! - [`video`]: Playback types ([`PlaybackState`](video::PlaybackState),
//!   [`PlaybackMode`](video::PlaybackMode), [`Volume`](video::Volume),
//!   [`QualityLevel`](video::QualityLevel))

pub mod diagnostics;
pub mod error;
pub mod ui;
pub mod video;
