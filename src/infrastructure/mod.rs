// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`simulated`]: Deterministic in-memory engine (implements [`PlaybackEngine`])
//!   used by tests, benches and headless hosts
//!
//! [`PlaybackEngine`]: crate::application::port::PlaybackEngine

pub mod simulated;

pub use simulated::{AutoplayPolicy, SimulatedEngine, SimulatedEngineFactory, SimulatedEngineHandle};
