// SPDX-License-Identifier: MPL-2.0
//! Adaptive-bitrate quality level value objects.

use std::fmt;

/// One adaptive-bitrate rendition as mirrored from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityLevel {
    /// Stable engine index.
    pub id: usize,
    /// Display label derived from the vertical resolution (e.g. `720p`).
    pub label: String,
    /// Vertical resolution in pixels.
    pub height_px: u32,
    /// Advertised bitrate in bits per second.
    pub bitrate: u64,
    /// Engine-owned enabled flag.
    pub enabled: bool,
}

impl QualityLevel {
    /// Creates a level and derives its label from the height.
    #[must_use]
    pub fn new(id: usize, height_px: u32, bitrate: u64, enabled: bool) -> Self {
        Self {
            id,
            label: Self::label_for(height_px),
            height_px,
            bitrate,
            enabled,
        }
    }

    /// Label for a given vertical resolution.
    #[must_use]
    pub fn label_for(height_px: u32) -> String {
        format!("{height_px}p")
    }
}

/// Which quality the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualitySelection {
    /// Every level enabled, the engine picks.
    #[default]
    Auto,
    /// Exactly one level enabled.
    Manual(usize),
}

impl QualitySelection {
    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl fmt::Display for QualitySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Manual(id) => write!(f, "#{id}"),
        }
    }
}
