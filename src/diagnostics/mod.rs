// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting transport activity.
//!
//! The controller reports user actions, state transitions, warnings and
//! errors through a [`DiagnosticsHandle`]. A [`DiagnosticsCollector`] stores
//! them in a memory-bounded [`CircularBuffer`] and exports them as a JSON
//! report.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped event
//! - [`BufferCapacity`]: Newtype for validated buffer capacity bounds

mod buffer;
mod collector;
mod events;
mod export;
mod report;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    DiagnosticEvent, DiagnosticEventKind, ErrorEvent, ErrorType, PlaybackStateEvent, UserAction,
    WarningEvent, WarningType,
};
pub use export::{default_export_directory, report_filename, write_atomic};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent};
