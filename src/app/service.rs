//! Event service: the entry point around the shared event engine.
//!
//! [`EventService`] borrows the [`SharedEngine`] (usually a `static`) and
//! exposes the two things the rest of the firmware needs: a periodic
//! [`tick`](EventService::tick) and [`handle_command`](EventService::handle_command)
//! for configuration.  Storage flows through [`ConfigPort`], hardware
//! through [`LoadPort`] + [`ParameterPort`].
//!
//! ```text
//!  ConfigPort ◀──▶ ┌────────────────────────┐ ◀──▶ LoadPort
//!                  │      EventService      │
//!  EventCommand ──▶│  SharedEngine · dirty  │ ◀──▶ ParameterPort
//!                  └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::EventConfig;
use crate::error::{ConfigError, Result};
use crate::events::SharedEngine;

use super::commands::EventCommand;
use super::ports::{ConfigPort, LoadPort, ParameterPort};

/// Delay between the last configuration change and the automatic save.
pub const AUTO_SAVE_DELAY_MS: u32 = 5_000;

/// Orchestrates configuration and ticking of one shared engine.
pub struct EventService<'a, const EVENTS: usize, const TIMERS: usize> {
    engine: &'a SharedEngine<EVENTS, TIMERS>,
    tick_period_ms: u32,
    tick_count: u64,
    config_dirty: bool,
    dirty_since_tick: u64,
}

impl<'a, const EVENTS: usize, const TIMERS: usize> EventService<'a, EVENTS, TIMERS> {
    /// Wrap `engine`.  Does **not** load configuration; call
    /// [`start`](Self::start) next.
    pub fn new(engine: &'a SharedEngine<EVENTS, TIMERS>) -> Self {
        Self {
            engine,
            tick_period_ms: EventConfig::default().tick_period_ms,
            tick_count: 0,
            config_dirty: false,
            dirty_since_tick: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise the engine and apply the stored configuration.
    ///
    /// A missing configuration (first boot) leaves every rule disabled.
    /// A corrupted or invalid one is reported and also leaves the engine
    /// inert.
    pub fn start(&mut self, store: &impl ConfigPort) -> Result<()> {
        self.engine.with(|e| e.initialize())?;
        match store.load() {
            Ok(config) => self.apply(&config),
            Err(ConfigError::NotFound) => {
                info!("EventService: no stored config, all rules disabled");
                Ok(())
            }
            Err(e) => {
                warn!("EventService: stored config unusable ({e}), all rules disabled");
                Err(e.into())
            }
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one engine tick.  Returns how many rules fired.
    ///
    /// A tick rejected with [`Error::Busy`](crate::error::Error::Busy) did
    /// not run and is not counted.
    pub fn tick(&mut self, hw: &mut (impl LoadPort + ParameterPort)) -> Result<usize> {
        let fired = self.engine.tick(hw)?;
        self.tick_count += 1;
        Ok(fired)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a configuration command.
    ///
    /// Rejected commands leave the engine unchanged and are reported to the
    /// caller.
    pub fn handle_command(&mut self, cmd: EventCommand, store: &impl ConfigPort) -> Result<()> {
        match cmd {
            EventCommand::ConfigureRule { slot, rule } => {
                self.engine.with(|e| e.configure_rule(slot, rule))??;
                self.mark_config_dirty();
            }
            EventCommand::DisableRule(slot) => {
                self.engine.with(|e| e.disable_rule(slot))??;
                self.mark_config_dirty();
            }
            EventCommand::ArmTimer { timer, ticks } => {
                self.engine.with(|e| e.arm_timer(timer, ticks))??;
            }
            EventCommand::StopTimer(timer) => {
                self.engine.with(|e| e.stop_timer(timer))??;
            }
            EventCommand::ApplyConfig(config) => {
                self.apply(&config)?;
                self.mark_config_dirty();
            }
            EventCommand::LoadConfig => {
                let config = store.load()?;
                self.apply(&config)?;
                self.config_dirty = false;
            }
            EventCommand::SaveConfig => {
                self.save(store)?;
            }
            EventCommand::Reset => {
                self.engine.with(|e| e.initialize())?;
                self.mark_config_dirty();
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Tick period of the applied configuration (milliseconds).
    pub fn tick_period_ms(&self) -> u32 {
        self.tick_period_ms
    }

    /// Ticks that actually ran through this service since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Snapshot of the live table as a configuration.
    pub fn current_config(&self) -> Result<EventConfig> {
        self.engine.with(|e| e.to_config(self.tick_period_ms))?
    }

    // ── Config dirty-flag management ──────────────────────────

    /// Mark the table as modified since the last save.
    pub fn mark_config_dirty(&mut self) {
        if !self.config_dirty {
            self.config_dirty = true;
            self.dirty_since_tick = self.tick_count;
        }
    }

    /// Whether the table has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }

    /// Save once [`AUTO_SAVE_DELAY_MS`] of ticks have passed since the
    /// last change.  Returns `true` if the config was saved.
    pub fn auto_save_if_needed(&mut self, store: &impl ConfigPort) -> bool {
        if !self.config_dirty {
            return false;
        }
        let ticks_since_dirty = self.tick_count.saturating_sub(self.dirty_since_tick);
        if ticks_since_dirty * u64::from(self.tick_period_ms) < u64::from(AUTO_SAVE_DELAY_MS) {
            return false;
        }
        match self.save(store) {
            Ok(()) => true,
            Err(e) => {
                warn!("EventService: auto-save failed: {e}");
                false
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(&mut self, config: &EventConfig) -> Result<()> {
        self.engine.with(|e| e.apply_config(config))??;
        self.tick_period_ms = config.tick_period_ms;
        Ok(())
    }

    fn save(&mut self, store: &impl ConfigPort) -> Result<()> {
        let config = self.current_config()?;
        store.save(&config)?;
        self.config_dirty = false;
        info!("EventService: config saved ({} rules)", config.rules.len());
        Ok(())
    }
}
