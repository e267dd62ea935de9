//! Inbound commands to the event service.
//!
//! These represent configuration requests from the outside world (remote
//! command interface, front panel) that the
//! [`EventService`](super::service::EventService) applies to the engine.

use crate::config::EventConfig;
use crate::events::rules::Rule;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum EventCommand {
    /// Overwrite one rule slot.
    ConfigureRule { slot: usize, rule: Rule },

    /// Disable one rule slot.
    DisableRule(usize),

    /// Start a timer from outside the rule table.
    ArmTimer { timer: usize, ticks: u32 },

    /// Stop a timer.
    StopTimer(usize),

    /// Replace the whole table (and tick period) with a new configuration.
    ApplyConfig(EventConfig),

    /// Re-read the stored configuration and apply it.
    LoadConfig,

    /// Persist the current table immediately.
    SaveConfig,

    /// Disable every rule and stop every timer.
    Reset,
}
