//! Countdown timer bank.
//!
//! Timers are the intermediate signals between rules: one rule arms a
//! timer, another fires when it reaches zero.  Each slot is either
//! [`TIMER_STOPPED`] or a number of remaining ticks.
//!
//! ```text
//!   arm(3)     tick      tick      tick      tick
//!  ───────▶ 3 ──────▶ 2 ──────▶ 1 ──────▶ 0 ──────▶ STOPPED
//!                                         ▲
//!                              is_zero() for this one pass
//! ```
//!
//! A zero is visible to exactly one evaluation pass.  A slot armed to `0`
//! between ticks has not been seen yet, so the next advance holds it at
//! zero instead of latching it.

use crate::error::{IndexOutOfRange, SlotKind};

/// Sentinel value for an inactive / expired-and-latched timer.
pub const TIMER_STOPPED: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    value: u32,
    /// Cleared when the slot is armed between passes.
    seen: bool,
}

impl Slot {
    const STOPPED: Self = Self {
        value: TIMER_STOPPED,
        seen: true,
    };
}

/// Fixed bank of `N` countdown timers.
#[derive(Debug, Clone)]
pub struct TimerBank<const N: usize> {
    slots: [Slot; N],
}

impl<const N: usize> TimerBank<N> {
    /// A bank with every timer stopped.
    pub const fn new() -> Self {
        Self {
            slots: [Slot::STOPPED; N],
        }
    }

    /// Number of timers in the bank.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Stop every timer.
    pub fn reset(&mut self) {
        self.slots = [Slot::STOPPED; N];
    }

    /// Advance phase of an engine tick.
    ///
    /// Zeros that a pass has already seen latch to `STOPPED`, zeros armed
    /// since the last pass are held, running timers count down by one.
    pub fn tick(&mut self) {
        for slot in &mut self.slots {
            match slot.value {
                0 if slot.seen => slot.value = TIMER_STOPPED,
                0 | TIMER_STOPPED => {}
                _ => slot.value -= 1,
            }
            slot.seen = true;
        }
    }

    /// Set timer `index` to `ticks`, restarting it whatever its state.
    ///
    /// Use this between ticks.  Arming with [`TIMER_STOPPED`] stops the
    /// timer.
    pub fn arm(&mut self, index: usize, ticks: u32) -> Result<(), IndexOutOfRange> {
        let i = IndexOutOfRange::check(SlotKind::Timer, index, N)?;
        self.slots[i] = Slot {
            value: ticks,
            seen: false,
        };
        Ok(())
    }

    /// Arm from inside an evaluation pass.  Later rules of the same pass
    /// observe the new value, so a zero latches on the next advance.
    pub(crate) fn arm_in_pass(&mut self, index: usize, ticks: u32) -> Result<(), IndexOutOfRange> {
        let i = IndexOutOfRange::check(SlotKind::Timer, index, N)?;
        self.slots[i] = Slot {
            value: ticks,
            seen: true,
        };
        Ok(())
    }

    /// Stop timer `index`.
    pub fn stop(&mut self, index: usize) -> Result<(), IndexOutOfRange> {
        let i = IndexOutOfRange::check(SlotKind::Timer, index, N)?;
        self.slots[i] = Slot::STOPPED;
        Ok(())
    }

    /// True iff timer `index` currently reads exactly zero.
    ///
    /// Out-of-range indices read as not zero.
    pub fn is_zero(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.value == 0)
    }

    /// True iff timer `index` is latched or was never armed.
    pub fn is_stopped(&self, index: usize) -> bool {
        self.slots.get(index).is_none_or(|s| s.value == TIMER_STOPPED)
    }

    /// Remaining ticks, or `None` when stopped or out of range.
    pub fn remaining(&self, index: usize) -> Option<u32> {
        self.slots
            .get(index)
            .map(|s| s.value)
            .filter(|&v| v != TIMER_STOPPED)
    }

    /// Raw values including the [`TIMER_STOPPED`] sentinel.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().map(|s| s.value)
    }
}

impl<const N: usize> Default for TimerBank<N> {
    fn default() -> Self {
        Self::new()
    }
}
