// SPDX-License-Identifier: MPL-2.0
//! `stream_lens` is the transport controller shared by a live-stream player
//! and an on-demand player.
//!
//! It turns an adaptive-streaming engine, reached through the
//! [`PlaybackEngine`](application::port::PlaybackEngine) port, into an
//! interactive transport: live-edge tracking, seekable and buffered ranges,
//! quality selection, keyboard shortcuts, drag scrubbing and controls
//! auto-hide.

#![doc(html_root_url = "https://docs.rs/stream_lens/0.1.0")]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod player;

#[cfg(test)]
pub(crate) mod test_utils;
