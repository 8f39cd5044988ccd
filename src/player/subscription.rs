// SPDX-License-Identifier: MPL-2.0
//! Periodic tick for iced hosts.
//!
//! The controller has no clock of its own: engine events and both timers
//! advance on [`Message::Tick`]. This helper produces that tick while the
//! controller needs it and nothing otherwise.

use super::controller::{Message, PlaybackController};
use iced::{time, Subscription};
use std::time::Duration;

/// Tick interval. Short enough for the 500ms seek indicator.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Creates the tick subscription for `controller`.
pub fn tick_subscription(controller: &PlaybackController) -> Subscription<Message> {
    if controller.needs_tick() {
        time::every(TICK_INTERVAL).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::PlaybackMode;
    use crate::infrastructure::simulated::{AutoplayPolicy, SimulatedEngineFactory};
    use crate::player::TransportSettings;

    #[test]
    fn tick_interval_is_below_indicator_duration() {
        assert!(TICK_INTERVAL < crate::player::indicator::SEEK_INDICATOR_DURATION);
    }

    #[test]
    fn detached_controller_needs_no_tick() {
        let controller = PlaybackController::new(
            TransportSettings::new(PlaybackMode::Live),
            Box::new(SimulatedEngineFactory::new(AutoplayPolicy::Allow)),
        );
        assert!(!controller.needs_tick());
    }
}
