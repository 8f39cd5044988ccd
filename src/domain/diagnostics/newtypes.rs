// SPDX-License-Identifier: MPL-2.0
//! Event log sizing.

/// Events kept per session.
pub mod buffer_capacity_bounds {
    pub const MIN: usize = 16;
    pub const MAX: usize = 4096;
    pub const DEFAULT: usize = 256;
}

/// Number of diagnostic events retained per player session.
///
/// ```
/// use stream_lens::domain::diagnostics::BufferCapacity;
///
/// assert_eq!(BufferCapacity::new(8).value(), 16);
/// assert_eq!(BufferCapacity::new(512).value(), 512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}
