// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module is the single source of truth for defaults and bounds used by
//! the config sections and the domain newtypes.
//!
//! # Categories
//!
//! - **Playback**: Autoplay, initial volume, live-edge detection
//! - **Controls**: Auto-hide delay and keyboard seek steps
//! - **Diagnostics**: Event log sizing

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Whether on-demand sources start playing on attach. Live always autoplays.
pub const DEFAULT_AUTOPLAY: bool = true;

/// Initial volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Distance from the live edge under which a stream counts as live (seconds).
pub const DEFAULT_LIVE_EDGE_THRESHOLD_SECS: f64 = 5.0;

/// Upper bound for the live-edge threshold (seconds).
pub const MAX_LIVE_EDGE_THRESHOLD_SECS: f64 = 60.0;

// ==========================================================================
// Controls Defaults
// ==========================================================================

/// Inactivity delay before controls hide during playback (milliseconds).
pub const DEFAULT_CONTROLS_HIDE_DELAY_MS: u32 = 3_000;

/// Minimum hide delay (milliseconds).
pub const MIN_CONTROLS_HIDE_DELAY_MS: u32 = 500;

/// Maximum hide delay (milliseconds).
pub const MAX_CONTROLS_HIDE_DELAY_MS: u32 = 30_000;

/// Arrow-key seek step (seconds).
pub const DEFAULT_KEYBOARD_SEEK_STEP_SECS: f64 = 5.0;

/// J/L seek step (seconds).
pub const DEFAULT_LONG_SEEK_STEP_SECS: f64 = 10.0;

/// Minimum keyboard seek step (seconds).
pub const MIN_KEYBOARD_SEEK_STEP_SECS: f64 = 0.5;

/// Maximum keyboard seek step (seconds).
pub const MAX_KEYBOARD_SEEK_STEP_SECS: f64 = 60.0;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Whether the controller reports into a diagnostics collector.
pub const DEFAULT_DIAGNOSTICS_ENABLED: bool = true;

/// Default number of events kept in the diagnostics log.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 256;

/// Minimum diagnostics log size.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 16;

/// Maximum diagnostics log size.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 4096;
