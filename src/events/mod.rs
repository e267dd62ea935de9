//! Table-driven event engine.
//!
//! Couples load conditions (sources) to load actions (destinations)
//! through a fixed table of rules, with a bank of countdown timers as
//! intermediate signals.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  EventEngine::tick()                                       │
//! │                                                            │
//! │  1. advance   TimerBank  ── 0 → STOPPED, n → n-1           │
//! │                                                            │
//! │  2. evaluate  rules[0] ── source? ──▶ destination          │
//! │               rules[1] ── source? ──▶ destination          │
//! │                 ...        (index order, effects of        │
//! │               rules[N-1]    earlier rules are visible)     │
//! └────────────────────────────────────────────────────────────┘
//!        ▲                                  │
//!        │ trigger edge, parameters         │ trigger out, mode,
//!        │                                  ▼ parameter writes
//! ┌────────────────────────────────────────────────────────────┐
//! │           LoadPort + ParameterPort (hardware side)         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns its timers and rules by value and holds no other state
//! between ticks apart from a tick counter used for logging.

pub mod rules;
pub mod shared;
pub mod timers;

use log::{debug, info, trace, warn};

use crate::app::ports::{LoadPort, ParameterPort};
use crate::config::EventConfig;
use crate::error::{ConfigError, Error, IndexOutOfRange, Result, SlotKind};

use rules::Rule;
use timers::TimerBank;

pub use shared::SharedEngine;
pub use timers::TIMER_STOPPED;

/// Number of rule slots in the firmware's event table.
pub const MAX_EVENTS: usize = 16;

/// Number of timers in the firmware's timer bank.
pub const MAX_TIMERS: usize = 8;

/// Engine with the firmware's table dimensions.
pub type DefaultEngine = EventEngine<MAX_EVENTS, MAX_TIMERS>;

/// Event table plus timer bank, advanced one tick at a time.
#[derive(Debug, Clone)]
pub struct EventEngine<const EVENTS: usize, const TIMERS: usize> {
    rules: [Rule; EVENTS],
    timers: TimerBank<TIMERS>,
    /// Monotonic tick counter (wraps at u64::MAX).
    tick_count: u64,
}

impl<const EVENTS: usize, const TIMERS: usize> EventEngine<EVENTS, TIMERS> {
    /// An engine with every rule disabled and every timer stopped.
    pub const fn new() -> Self {
        Self {
            rules: [Rule::DISABLED; EVENTS],
            timers: TimerBank::new(),
            tick_count: 0,
        }
    }

    /// Reset to the inert state: rules disabled, timers stopped.
    pub fn initialize(&mut self) {
        self.rules = [Rule::DISABLED; EVENTS];
        self.timers.reset();
        self.tick_count = 0;
        info!("events: initialised {EVENTS} rules, {TIMERS} timers");
    }

    // ── Configuration ─────────────────────────────────────────

    /// Overwrite rule slot `index`.
    ///
    /// Rejected calls leave the table unchanged.
    pub fn configure_rule(&mut self, index: usize, rule: Rule) -> Result<()> {
        let result = IndexOutOfRange::check(SlotKind::Rule, index, EVENTS)
            .map_err(Error::from)
            .and_then(|i| rule.validate(TIMERS).map(|()| i));
        match result {
            Ok(i) => {
                self.rules[i] = rule;
                info!("events: rule {i} = {rule}");
                Ok(())
            }
            Err(e) => {
                warn!("events: rejected rule {index} ({rule}): {e}");
                Err(e)
            }
        }
    }

    /// Disable rule slot `index`.
    pub fn disable_rule(&mut self, index: usize) -> Result<()> {
        self.configure_rule(index, Rule::DISABLED)
    }

    /// The rule in slot `index`.
    pub fn rule(&self, index: usize) -> Result<&Rule> {
        let i = IndexOutOfRange::check(SlotKind::Rule, index, EVENTS)?;
        Ok(&self.rules[i])
    }

    /// The whole event table.
    pub fn rules(&self) -> &[Rule; EVENTS] {
        &self.rules
    }

    /// Start timer `index` with `ticks` remaining.
    pub fn arm_timer(&mut self, index: usize, ticks: u32) -> Result<()> {
        self.timers.arm(index, ticks)?;
        debug!("events: timer {index} armed with {ticks}");
        Ok(())
    }

    /// Stop timer `index`.
    pub fn stop_timer(&mut self, index: usize) -> Result<()> {
        self.timers.stop(index)?;
        Ok(())
    }

    pub fn timers(&self) -> &TimerBank<TIMERS> {
        &self.timers
    }

    /// Number of ticks processed since the last [`initialize`](Self::initialize).
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Replace the whole table with `config`.
    ///
    /// The configuration is validated first; on error nothing changes.
    /// Timers are stopped because their meaning depends on the rules.
    pub fn apply_config(&mut self, config: &EventConfig) -> Result<()> {
        if let Err(e) = config.validate_for(EVENTS, TIMERS) {
            warn!("events: rejected config: {e}");
            return Err(e.into());
        }
        self.rules = [Rule::DISABLED; EVENTS];
        self.timers.reset();
        for entry in &config.rules {
            self.rules[entry.slot as usize] = entry.rule;
        }
        info!(
            "events: applied config ({} rules, tick {} ms)",
            config.rules.len(),
            config.tick_period_ms
        );
        Ok(())
    }

    /// Export every enabled slot as a configuration.
    pub fn to_config(&self, tick_period_ms: u32) -> Result<EventConfig> {
        let mut config = EventConfig {
            tick_period_ms,
            ..EventConfig::default()
        };
        for (slot, rule) in self.rules.iter().enumerate() {
            if rule.is_enabled() {
                let slot = u8::try_from(slot)
                    .map_err(|_| ConfigError::ValidationFailed("rule slot exceeds u8"))?;
                config.push(slot, *rule)?;
            }
        }
        Ok(config)
    }

    // ── Tick ──────────────────────────────────────────────────

    /// Run one engine tick and return how many rules fired.
    ///
    /// 1. Advance every timer, so a countdown reaching zero is visible to
    ///    the rules of this same tick.
    /// 2. Evaluate rules in index order; a fired rule's destination is
    ///    applied before the next rule's source is checked.
    ///
    /// Never fails: every rule was range-checked when it was configured.
    pub fn tick(&mut self, hw: &mut (impl LoadPort + ParameterPort)) -> usize {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.timers.tick();

        let mut fired = 0;
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.source.is_triggered(&self.timers, &*hw) {
                debug!("events: tick {} rule {index} fired: {rule}", self.tick_count);
                rule.destination.apply(&mut self.timers, hw);
                fired += 1;
            }
        }

        trace!("events: tick {} done, {fired} fired", self.tick_count);
        fired
    }
}

impl<const EVENTS: usize, const TIMERS: usize> Default for EventEngine<EVENTS, TIMERS> {
    fn default() -> Self {
        Self::new()
    }
}
