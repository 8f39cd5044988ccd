// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports the player components depend on.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - The player layer depends on these ports, never on a concrete engine
//! - Infrastructure adapters implement the ports
//! - Hosts wire an adapter into a [`PlaybackController`](crate::player::PlaybackController)

pub mod port;
