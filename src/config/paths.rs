// SPDX-License-Identifier: MPL-2.0
//! Where `settings.toml` lives.
//!
//! First match wins: the directory passed to [`config_dir_with_override`],
//! then a non-empty `STREAM_LENS_CONFIG_DIR`, then `StreamLens` under the
//! platform config directory.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "StreamLens";

pub const ENV_CONFIG_DIR: &str = "STREAM_LENS_CONFIG_DIR";

/// `None` only when no override is set and the platform has no config dir.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with_override(None)
}

#[must_use]
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    override_path
        .or_else(env_config_dir)
        .or_else(|| dirs::config_dir().map(|base| base.join(APP_DIR_NAME)))
}

fn env_config_dir() -> Option<PathBuf> {
    std::env::var_os(ENV_CONFIG_DIR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below mutate the process environment.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn explicit_override_wins() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "/from/env");
        let dir = config_dir_with_override(Some(PathBuf::from("/explicit")));
        std::env::remove_var(ENV_CONFIG_DIR);
        assert_eq!(dir, Some(PathBuf::from("/explicit")));
    }

    #[test]
    fn env_var_overrides_platform_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "/from/env");
        let dir = config_dir();
        std::env::remove_var(ENV_CONFIG_DIR);
        assert_eq!(dir, Some(PathBuf::from("/from/env")));
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");
        let dir = config_dir();
        std::env::remove_var(ENV_CONFIG_DIR);
        if let Some(dir) = dir {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }
}
