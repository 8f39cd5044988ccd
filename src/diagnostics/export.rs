// SPDX-License-Identifier: MPL-2.0
//! Report file helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// File name for a report generated at `now`, e.g.
/// `stream_lens_diagnostics_20250114-093000.json`.
#[must_use]
pub fn report_filename(now: DateTime<Utc>) -> String {
    format!("stream_lens_diagnostics_{}.json", now.format("%Y%m%d-%H%M%S"))
}

/// The user's Documents folder, or the working directory.
#[must_use]
pub fn default_export_directory() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

/// Writes `content` through a temporary sibling file and renames it into place.
///
/// # Errors
///
/// Returns the underlying I/O error. The temporary file is removed on failure.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
