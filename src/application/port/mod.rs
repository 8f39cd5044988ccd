// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`engine`]: Adaptive-streaming playback engine
//!
//! # Design Notes
//!
//! - Traits use domain types only (no Iced handles, no engine library types)
//! - No `async fn`: asynchronous outcomes come back as [`EngineEvent`]s
//!   over the subscription channel

pub mod engine;

pub use engine::{
    EngineEvent, EngineEventReceiver, EngineEventSender, EngineFactory, EngineQualityLevel,
    MimeHint, PlayTicket, PlaybackEngine, SubscriptionId, TimeRange, TimeRanges,
};
