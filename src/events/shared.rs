//! Engine cell shared between the tick interrupt and the configuration path.
//!
//! ```text
//! ┌──────────────┐   tick()            ┌──────────────────────────┐
//! │  Tick timer  │───────────────────▶│                          │
//! │  (periodic)  │                     │  SharedEngine            │
//! └──────────────┘                     │  critical section +      │
//! ┌──────────────┐   configure_rule()  │  RefCell<EventEngine>    │
//! │  Config /    │───────────────────▶│                          │
//! │  command path│                     └──────────────────────────┘
//! └──────────────┘
//! ```
//!
//! Every access runs inside a critical section, so a tick can never
//! interleave with a configuration write.  A nested access from inside a
//! running tick (a port implementation calling back into the engine) is
//! rejected with [`Error::Busy`] rather than deadlocking.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::warn;

use crate::app::ports::{LoadPort, ParameterPort};
use crate::error::{Error, Result};

use super::EventEngine;

/// An [`EventEngine`] that can live in a `static`.
pub struct SharedEngine<const EVENTS: usize, const TIMERS: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<EventEngine<EVENTS, TIMERS>>>,
}

impl<const EVENTS: usize, const TIMERS: usize> SharedEngine<EVENTS, TIMERS> {
    /// A shared engine with every rule disabled and every timer stopped.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(EventEngine::new())),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut EventEngine<EVENTS, TIMERS>) -> R) -> Result<R> {
        self.inner.lock(|cell| {
            let Ok(mut engine) = cell.try_borrow_mut() else {
                warn!("events: re-entrant engine access rejected");
                return Err(Error::Busy);
            };
            Ok(f(&mut engine))
        })
    }

    /// One engine tick under the critical section.
    pub fn tick(&self, hw: &mut (impl LoadPort + ParameterPort)) -> Result<usize> {
        self.with(|engine| engine.tick(hw))
    }
}

impl<const EVENTS: usize, const TIMERS: usize> Default for SharedEngine<EVENTS, TIMERS> {
    fn default() -> Self {
        Self::new()
    }
}
