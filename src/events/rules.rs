//! Event rules: one source condition coupled to one destination action.
//!
//! Sources and destinations are separate sum types.  Each variant carries
//! exactly the fields it needs, so there is no way to express a timer
//! source with a stray parameter limit, or a parameter write without a
//! target.

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::{LoadPort, ParameterPort};
use crate::error::{Error, IndexOutOfRange, SlotKind};
use crate::load::{LoadMode, Param, TriggerEdge, Value};

use super::timers::TimerBank;

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Condition checked once per tick to decide whether a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Source {
    /// Never fires.
    #[default]
    Disabled,
    /// Fires on the pass in which `timer` reads exactly zero.
    TimerZero { timer: u8 },
    /// Fires while `param > limit`.
    ParamAbove { param: Param, limit: Value },
    /// Fires while `param < limit`.
    ParamBelow { param: Param, limit: Value },
    /// Fires on the tick the trigger input falls.
    TriggerFalling,
    /// Fires on the tick the trigger input rises.
    TriggerRising,
}

impl Source {
    /// Evaluate the condition against the current timers and hardware.
    pub fn is_triggered<const T: usize>(
        &self,
        timers: &TimerBank<T>,
        hw: &(impl LoadPort + ParameterPort),
    ) -> bool {
        match *self {
            Self::Disabled => false,
            Self::TimerZero { timer } => timers.is_zero(timer as usize),
            Self::ParamAbove { param, limit } => hw.read(param) > limit,
            Self::ParamBelow { param, limit } => hw.read(param) < limit,
            Self::TriggerFalling => hw.trigger_input_edge() == TriggerEdge::Falling,
            Self::TriggerRising => hw.trigger_input_edge() == TriggerEdge::Rising,
        }
    }

    /// Timer watched by this source, if any.
    pub const fn timer(&self) -> Option<u8> {
        match *self {
            Self::TimerZero { timer } => Some(timer),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::TimerZero { timer } => write!(f, "timer {timer} == 0"),
            Self::ParamAbove { param, limit } => write!(f, "{param} > {limit}"),
            Self::ParamBelow { param, limit } => write!(f, "{param} < {limit}"),
            Self::TriggerFalling => write!(f, "trigger falling"),
            Self::TriggerRising => write!(f, "trigger rising"),
        }
    }
}

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Action performed when a rule's source fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Destination {
    /// Do nothing.
    #[default]
    None,
    /// Write `value` into `param`.
    SetParam { param: Param, value: Value },
    /// (Re)start `timer` with `ticks` remaining.
    ArmTimer { timer: u8, ticks: u32 },
    /// Drive the trigger output high.
    TriggerHigh,
    /// Drive the trigger output low.
    TriggerLow,
    /// Switch the load to another regulation mode.
    SetMode(LoadMode),
    /// Switch the load off.
    LoadOff,
}

impl Destination {
    /// Perform the action.  Timer arming is visible to later rules of the
    /// same pass.
    pub fn apply<const T: usize>(
        &self,
        timers: &mut TimerBank<T>,
        hw: &mut (impl LoadPort + ParameterPort),
    ) {
        match *self {
            Self::None => {}
            Self::SetParam { param, value } => hw.write(param, value),
            Self::ArmTimer { timer, ticks } => {
                // Rules are range-checked when configured.
                if let Err(e) = timers.arm_in_pass(timer as usize, ticks) {
                    warn!("events: skipped arm, {e}");
                }
            }
            Self::TriggerHigh => hw.set_trigger_output(true),
            Self::TriggerLow => hw.set_trigger_output(false),
            Self::SetMode(mode) => hw.set_mode(mode),
            Self::LoadOff => hw.load_off(),
        }
    }

    /// Timer armed by this destination, if any.
    pub const fn timer(&self) -> Option<u8> {
        match *self {
            Self::ArmTimer { timer, .. } => Some(timer),
            _ => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::SetParam { param, value } => write!(f, "{param} := {value}"),
            Self::ArmTimer { timer, ticks } => write!(f, "arm timer {timer} = {ticks}"),
            Self::TriggerHigh => write!(f, "trigger out high"),
            Self::TriggerLow => write!(f, "trigger out low"),
            Self::SetMode(mode) => write!(f, "mode {mode}"),
            Self::LoadOff => write!(f, "load off"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One slot of the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    pub source: Source,
    pub destination: Destination,
}

impl Rule {
    /// The inert rule every slot starts with.
    pub const DISABLED: Self = Self {
        source: Source::Disabled,
        destination: Destination::None,
    };

    pub const fn new(source: Source, destination: Destination) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        !matches!(self.source, Source::Disabled)
    }

    /// Check the rule against a table with `timers` timer slots.
    ///
    /// Every timer reference must be in range and parameter writes must
    /// target a setpoint.
    pub fn validate(&self, timers: usize) -> Result<(), Error> {
        for timer in [self.source.timer(), self.destination.timer()]
            .into_iter()
            .flatten()
        {
            IndexOutOfRange::check(SlotKind::Timer, timer as usize, timers)?;
        }
        if let Destination::SetParam { param, .. } = self.destination {
            if !param.is_writable() {
                return Err(Error::ReadOnlyParameter(param));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}
