// SPDX-License-Identifier: MPL-2.0
//! Shape of the exported JSON report.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DiagnosticEventKind;

/// Header of an exported report. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub stream_lens_version: String,
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
    /// Events discarded because the handle queue was full.
    #[serde(default)]
    pub dropped_events: u64,
    /// Events pushed out of the ring buffer by newer ones.
    #[serde(default)]
    pub evicted_events: u64,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(started: DateTime<Utc>, duration_ms: u64, event_count: usize) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            stream_lens_version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: started.to_rfc3339(),
            collection_duration_ms: duration_ms,
            event_count,
            dropped_events: 0,
            evicted_events: 0,
        }
    }

    #[must_use]
    pub fn with_losses(mut self, dropped: u64, evicted: u64) -> Self {
        self.dropped_events = dropped;
        self.evicted_events = evicted;
        self
    }
}

/// An event with its `Instant` replaced by milliseconds since collection start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    /// Events recorded before `start` get a zero offset.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(at: Instant, start: Instant, kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp_ms: at.saturating_duration_since(start).as_millis() as u64,
            kind,
        }
    }
}

/// Event counts by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub user_actions: usize,
    pub state_events: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl ReportSummary {
    #[must_use]
    pub fn from_events(events: &[SerializableEvent]) -> Self {
        events.iter().fold(Self::default(), |mut summary, event| {
            match event.kind {
                DiagnosticEventKind::UserAction { .. } => summary.user_actions += 1,
                DiagnosticEventKind::PlaybackState { .. } => summary.state_events += 1,
                DiagnosticEventKind::Warning { .. } => summary.warnings += 1,
                DiagnosticEventKind::Error { .. } => summary.errors += 1,
            }
            summary
        })
    }
}

/// Metadata, events and per-category counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub events: Vec<SerializableEvent>,
    pub summary: ReportSummary,
}

impl DiagnosticReport {
    #[must_use]
    pub fn new(metadata: ReportMetadata, events: Vec<SerializableEvent>) -> Self {
        let summary = ReportSummary::from_events(&events);
        Self {
            metadata,
            events,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ErrorEvent, ErrorType, UserAction};
    use std::time::Duration;

    #[test]
    fn serializable_event_uses_relative_millis() {
        let start = Instant::now();
        let event = SerializableEvent::new(
            start + Duration::from_millis(1_500),
            start,
            DiagnosticEventKind::UserAction {
                action: UserAction::ToggleMute,
                details: None,
            },
        );
        assert_eq!(event.timestamp_ms, 1_500);
    }

    #[test]
    fn summary_counts_categories() {
        let start = Instant::now();
        let events = vec![
            SerializableEvent::new(
                start,
                start,
                DiagnosticEventKind::UserAction {
                    action: UserAction::TogglePlayback,
                    details: None,
                },
            ),
            SerializableEvent::new(
                start,
                start,
                DiagnosticEventKind::Error {
                    event: ErrorEvent::new(ErrorType::Playback, "boom"),
                },
            ),
        ];
        let summary = ReportSummary::from_events(&events);
        assert_eq!(summary.user_actions, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 0);
    }

    #[test]
    fn report_serializes_flattened_events() {
        let start = Instant::now();
        let report = DiagnosticReport::new(
            ReportMetadata::new(Utc::now(), 10, 1),
            vec![SerializableEvent::new(
                start,
                start,
                DiagnosticEventKind::UserAction {
                    action: UserAction::Detach,
                    details: None,
                },
            )],
        );
        let json = serde_json::to_string(&report).expect("serialization should succeed");
        assert!(json.contains("\"timestamp_ms\":0"));
        assert!(json.contains("\"type\":\"user_action\""));
        assert!(json.contains("\"stream_lens_version\""));
    }

    #[test]
    fn loss_counters_default_when_absent() {
        let json = r#"{
            "generated_at": "2026-01-01T00:00:00+00:00",
            "stream_lens_version": "0.1.0",
            "collection_started_at": "2026-01-01T00:00:00+00:00",
            "collection_duration_ms": 5,
            "event_count": 0
        }"#;
        let metadata: ReportMetadata = serde_json::from_str(json).expect("valid metadata");
        assert_eq!(metadata.dropped_events, 0);
        assert_eq!(metadata.evicted_events, 0);
    }
}
