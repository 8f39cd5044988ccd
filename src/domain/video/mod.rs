// SPDX-License-Identifier: MPL-2.0
//! Video playback domain types.
//!
//! This module contains playback-related value objects and enums that are
//! independent of any presentation or infrastructure concerns.

pub mod newtypes;
pub mod playback;
pub mod quality;

// Re-export commonly used types
pub use newtypes::{KeyboardSeekStep, Volume};
pub use playback::{PlaybackMode, PlaybackState};
pub use quality::{QualityLevel, QualitySelection};
