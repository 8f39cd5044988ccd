// SPDX-License-Identifier: MPL-2.0
//! Transport configuration stored in a `settings.toml` file.
//!
//! | Section | Keys |
//! |---|---|
//! | `[playback]` | `autoplay`, `volume`, `muted`, `live_edge_threshold_secs` |
//! | `[controls]` | `hide_delay_ms`, `seek_step_secs`, `long_seek_step_secs` |
//! | `[diagnostics]` | `enabled`, `buffer_capacity` |
//!
//! Every key is optional. Absent keys read as the values in [`defaults`].
//! Range checks happen later, in [`crate::player::TransportSettings`].
//!
//! ```no_run
//! use stream_lens::config;
//!
//! let (mut cfg, warning) = config::load();
//! if let Some(key) = warning {
//!     eprintln!("settings ignored: {key}");
//! }
//! cfg.controls.hide_delay_ms = Some(5_000);
//! config::save(&cfg).expect("settings should be writable");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Status key returned by [`load`] when an existing file could not be used.
pub const LOAD_ERROR_KEY: &str = "notification-config-load-error";

/// `[playback]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Start on-demand sources on attach. Live sources always autoplay.
    #[serde(default = "default_autoplay", skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,

    /// Initial volume (0.0 to 1.0).
    #[serde(default = "default_volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    /// Start muted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    /// Distance from the live edge under which the stream shows as live (seconds).
    #[serde(
        default = "default_live_edge_threshold_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub live_edge_threshold_secs: Option<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            volume: default_volume(),
            muted: Some(false),
            live_edge_threshold_secs: default_live_edge_threshold_secs(),
        }
    }
}

/// `[controls]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlsConfig {
    /// Auto-hide delay while playing (milliseconds).
    #[serde(
        default = "default_hide_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub hide_delay_ms: Option<u32>,

    /// Arrow-key seek step (seconds).
    #[serde(
        default = "default_keyboard_seek_step_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub seek_step_secs: Option<f64>,

    /// J/L seek step (seconds).
    #[serde(
        default = "default_long_seek_step_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub long_seek_step_secs: Option<f64>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_hide_delay_ms(),
            seek_step_secs: default_keyboard_seek_step_secs(),
            long_seek_step_secs: default_long_seek_step_secs(),
        }
    }
}

/// `[diagnostics]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    #[serde(
        default = "default_diagnostics_enabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<bool>,

    /// Number of events kept in memory.
    #[serde(
        default = "default_buffer_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_capacity: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_diagnostics_enabled(),
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

/// Whole settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub controls: ControlsConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Serde default functions wrap each constant in `Some` so a missing key
/// reads the same as an explicit default.
macro_rules! serde_defaults {
    ($($name:ident: $ty:ty = $value:expr;)*) => {
        $(
            #[allow(clippy::unnecessary_wraps)]
            fn $name() -> Option<$ty> {
                Some($value)
            }
        )*
    };
}

serde_defaults! {
    default_autoplay: bool = DEFAULT_AUTOPLAY;
    default_volume: f32 = DEFAULT_VOLUME;
    default_live_edge_threshold_secs: f64 = DEFAULT_LIVE_EDGE_THRESHOLD_SECS;
    default_hide_delay_ms: u32 = DEFAULT_CONTROLS_HIDE_DELAY_MS;
    default_keyboard_seek_step_secs: f64 = DEFAULT_KEYBOARD_SEEK_STEP_SECS;
    default_long_seek_step_secs: f64 = DEFAULT_LONG_SEEK_STEP_SECS;
    default_diagnostics_enabled: bool = DEFAULT_DIAGNOSTICS_ENABLED;
    default_buffer_capacity: usize = DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY;
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Reads `settings.toml` from the resolved config directory.
///
/// Never fails. A missing file yields the defaults silently; an unreadable
/// or malformed one yields the defaults plus [`LOAD_ERROR_KEY`].
#[must_use]
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// [`load`] with an explicit config directory.
#[must_use]
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = config_path_with_override(base_dir).filter(|p| p.exists()) else {
        return (Config::default(), None);
    };
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            log::warn!("ignoring unreadable config {}: {err}", path.display());
            (Config::default(), Some(LOAD_ERROR_KEY.to_string()))
        }
    }
}

/// Parses the file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
/// if it is not valid TOML for [`Config`].
pub fn load_from_path(path: &Path) -> Result<Config> {
    Ok(toml::from_str(&fs::read_to_string(path)?)?)
}

/// Writes `settings.toml` into the resolved config directory.
///
/// # Errors
///
/// See [`save_to_path`].
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// [`save`] with an explicit config directory. Does nothing when no
/// directory can be resolved.
///
/// # Errors
///
/// See [`save_to_path`].
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match config_path_with_override(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Ok(()),
    }
}

/// Serializes `config` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns [`Error::Io`] on file errors and [`Error::Config`] if
/// serialization fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, text)?;
    Ok(())
}
