// SPDX-License-Identifier: MPL-2.0
//! Bounded event log storage.

use std::collections::VecDeque;

pub use crate::domain::diagnostics::BufferCapacity;

/// Fixed-size FIFO. Pushing into a full buffer drops the oldest entry and
/// bumps the eviction counter.
///
/// # Example
///
/// ```
/// use stream_lens::diagnostics::{BufferCapacity, CircularBuffer};
///
/// let mut log: CircularBuffer<&str> = CircularBuffer::new(BufferCapacity::default());
/// log.push("attach");
/// log.push("play");
///
/// assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec!["attach", "play"]);
/// assert_eq!(log.evicted(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    entries: VecDeque<T>,
    limit: usize,
    evicted: u64,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Skips [`BufferCapacity`] validation. A zero limit is raised to one.
    #[must_use]
    pub fn with_raw_capacity(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
            evicted: 0,
        }
    }

    /// Appends `item` and hands back the entry it displaced, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        let displaced = if self.entries.len() == self.limit {
            self.evicted += 1;
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(item);
        displaced
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Entries pushed out since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.evicted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY, MIN_DIAGNOSTICS_BUFFER_CAPACITY};
    use crate::domain::diagnostics::buffer_capacity_bounds;

    #[test]
    fn domain_bounds_match_config() {
        assert_eq!(buffer_capacity_bounds::MIN, MIN_DIAGNOSTICS_BUFFER_CAPACITY);
        assert_eq!(
            buffer_capacity_bounds::DEFAULT,
            DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY
        );
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut log: CircularBuffer<i32> = CircularBuffer::with_raw_capacity(3);
        let displaced: Vec<_> = (1..=5).filter_map(|i| log.push(i)).collect();

        assert_eq!(displaced, vec![1, 2]);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(log.evicted(), 2);
    }

    #[test]
    fn zero_limit_holds_one_entry() {
        let mut log: CircularBuffer<&str> = CircularBuffer::with_raw_capacity(0);
        assert_eq!(log.push("a"), None);
        assert_eq!(log.push("b"), Some("a"));
        assert_eq!(log.capacity(), 1);
    }

    #[test]
    fn clear_resets_contents_and_counter() {
        let mut log: CircularBuffer<i32> = CircularBuffer::new(BufferCapacity::new(32));
        for i in 0..40 {
            log.push(i);
        }
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.evicted(), 0);
        assert_eq!(log.capacity(), 32);
    }
}
