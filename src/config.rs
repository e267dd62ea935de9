//! Event configuration.
//!
//! The persisted form of the event table: the tick period plus every
//! configured (non-disabled) rule slot.  Stored via
//! [`ConfigPort`](crate::app::ports::ConfigPort) and applied with
//! [`EventEngine::apply_config`](crate::events::EventEngine::apply_config).

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::events::rules::{Destination, Rule, Source};
use crate::events::{MAX_EVENTS, MAX_TIMERS};
use crate::load::{LoadMode, Param};

/// Accepted tick period range (milliseconds).
pub const TICK_PERIOD_RANGE_MS: core::ops::RangeInclusive<u32> = 1..=1000;

/// Number of rules in [`EventConfig::demo`].
const DEMO_RULES: usize = 6;
const _: () = assert!(DEMO_RULES <= MAX_EVENTS);

/// One configured slot of the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Index into the event table.
    pub slot: u8,
    pub rule: Rule,
}

/// Event engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Period of the engine tick (milliseconds).
    pub tick_period_ms: u32,
    /// Configured slots; every slot not listed is disabled.
    pub rules: Vec<RuleEntry, MAX_EVENTS>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 10, // 100 Hz
            rules: Vec::new(),
        }
    }
}

impl EventConfig {
    /// Add a slot.  Fails once [`MAX_EVENTS`] entries are present.
    pub fn push(&mut self, slot: u8, rule: Rule) -> Result<(), ConfigError> {
        self.rules
            .push(RuleEntry { slot, rule })
            .map_err(|_| ConfigError::ValidationFailed("too many rule entries"))
    }

    /// Range-check the configuration against a table of `events` rule
    /// slots and `timers` timers.
    pub fn validate_for(&self, events: usize, timers: usize) -> Result<(), ConfigError> {
        if !TICK_PERIOD_RANGE_MS.contains(&self.tick_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "tick_period_ms must be 1–1000",
            ));
        }
        for (i, entry) in self.rules.iter().enumerate() {
            if entry.slot as usize >= events {
                return Err(ConfigError::ValidationFailed("rule slot out of range"));
            }
            if self.rules[..i].iter().any(|e| e.slot == entry.slot) {
                return Err(ConfigError::ValidationFailed("duplicate rule slot"));
            }
            if entry.rule.validate(timers).is_err() {
                return Err(ConfigError::ValidationFailed(
                    "rule references a missing timer or a read-only parameter",
                ));
            }
        }
        Ok(())
    }

    /// [`validate_for`](Self::validate_for) the default table dimensions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_for(MAX_EVENTS, MAX_TIMERS)
    }

    /// Over-temperature and trigger-pulse preset used by the simulator.
    ///
    /// | slot | source                 | destination              |
    /// |------|------------------------|--------------------------|
    /// | 0    | temperature > 75 °C    | load off                 |
    /// | 1    | trigger rising         | CC setpoint := 2 A       |
    /// | 2    | trigger rising         | arm timer 0 = 100 ticks  |
    /// | 3    | timer 0 == 0           | CC setpoint := 500 mA    |
    /// | 4    | measured voltage < 1 V | trigger out high         |
    /// | 5    | measured voltage > 1 V | trigger out low          |
    pub fn demo() -> Self {
        let rules: [Rule; DEMO_RULES] = [
            Rule::new(
                Source::ParamAbove {
                    param: Param::Temperature,
                    limit: 75_000,
                },
                Destination::LoadOff,
            ),
            Rule::new(
                Source::TriggerRising,
                Destination::SetParam {
                    param: LoadMode::ConstantCurrent.setpoint(),
                    value: 2_000,
                },
            ),
            Rule::new(
                Source::TriggerRising,
                Destination::ArmTimer {
                    timer: 0,
                    ticks: 100,
                },
            ),
            Rule::new(
                Source::TimerZero { timer: 0 },
                Destination::SetParam {
                    param: LoadMode::ConstantCurrent.setpoint(),
                    value: 500,
                },
            ),
            Rule::new(
                Source::ParamBelow {
                    param: Param::MeasuredVoltage,
                    limit: 1_000,
                },
                Destination::TriggerHigh,
            ),
            Rule::new(
                Source::ParamAbove {
                    param: Param::MeasuredVoltage,
                    limit: 1_000,
                },
                Destination::TriggerLow,
            ),
        ];

        let mut config = Self::default();
        for (slot, rule) in (0u8..).zip(rules) {
            let pushed = config.push(slot, rule);
            debug_assert!(pushed.is_ok(), "demo preset exceeds MAX_EVENTS");
        }
        config
    }
}
