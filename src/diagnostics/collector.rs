// SPDX-License-Identifier: MPL-2.0
//! Session event log: a cloneable sender side and a buffered receiver side.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::export::write_atomic;
use super::{
    BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind, DiagnosticReport,
    ErrorEvent, PlaybackStateEvent, ReportMetadata, SerializableEvent, UserAction, WarningEvent,
};
use crate::error::Result;

/// Queue depth between handles and the collector.
const CHANNEL_DEPTH: usize = 100;

/// Sender side of the event log.
///
/// Logging never blocks: when the queue is full the event is discarded and
/// counted, and the count shows up in the exported report.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    tx: Sender<DiagnosticEvent>,
    dropped: Arc<AtomicU64>,
}

impl DiagnosticsHandle {
    pub fn log_action(&self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    pub fn log_action_with_details(&self, action: UserAction, details: Option<String>) {
        self.emit(DiagnosticEventKind::UserAction { action, details });
    }

    pub fn log_state(&self, event: PlaybackStateEvent) {
        self.emit(DiagnosticEventKind::PlaybackState { event });
    }

    pub fn log_warning(&self, event: WarningEvent) {
        self.emit(DiagnosticEventKind::Warning { event });
    }

    pub fn log_error(&self, event: ErrorEvent) {
        self.emit(DiagnosticEventKind::Error { event });
    }

    fn emit(&self, kind: DiagnosticEventKind) {
        if let Err(TrySendError::Full(_)) = self.tx.try_send(DiagnosticEvent::new(kind)) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Receiver side of the event log.
///
/// Queued events move into a [`CircularBuffer`] on
/// [`process_pending`](Self::process_pending). A
/// [`PlaybackController`](crate::player::PlaybackController) that owns its
/// collector does this on every tick.
pub struct DiagnosticsCollector {
    events: CircularBuffer<DiagnosticEvent>,
    rx: Receiver<DiagnosticEvent>,
    tx: Sender<DiagnosticEvent>,
    dropped: Arc<AtomicU64>,
    started: Instant,
    started_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_channel_capacity(capacity, CHANNEL_DEPTH)
    }

    /// Same as [`new`](Self::new) with a custom queue depth (at least one).
    #[must_use]
    pub fn with_channel_capacity(capacity: BufferCapacity, depth: usize) -> Self {
        let (tx, rx) = bounded(depth.max(1));
        Self {
            events: CircularBuffer::new(capacity),
            rx,
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            started: Instant::now(),
            started_utc: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            tx: self.tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Drains the queue into the buffer.
    pub fn process_pending(&mut self) {
        for event in self.rx.try_iter() {
            self.events.push(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Buffered events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Events lost because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Empties the buffer and zeroes both loss counters.
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped.store(0, Ordering::Relaxed);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build_report(&self) -> DiagnosticReport {
        let events: Vec<SerializableEvent> = self
            .events
            .iter()
            .map(|e| SerializableEvent::new(e.timestamp, self.started, e.kind.clone()))
            .collect();
        let metadata = ReportMetadata::new(
            self.started_utc,
            self.started.elapsed().as_millis() as u64,
            events.len(),
        )
        .with_losses(self.dropped(), self.events.evicted());
        DiagnosticReport::new(metadata, events)
    }

    /// Pretty-printed JSON report of the buffered events.
    ///
    /// # Errors
    ///
    /// [`Error::Report`](crate::error::Error::Report) if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.build_report())?)
    }

    /// Writes the JSON report to `path` and returns the path.
    ///
    /// # Errors
    ///
    /// [`Error::Report`](crate::error::Error::Report) on serialization
    /// failure, [`Error::Io`](crate::error::Error::Io) on write failure.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        write_atomic(path, &self.export_json()?)?;
        Ok(path.to_path_buf())
    }
}

impl std::fmt::Debug for DiagnosticsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsCollector")
            .field("len", &self.events.len())
            .field("capacity", &self.events.capacity())
            .field("dropped", &self.dropped())
            .finish_non_exhaustive()
    }
}
