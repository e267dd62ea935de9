//! Trigger connector driver.
//!
//! ## Hardware
//!
//! One digital input (external trigger in) and one push-pull output
//! (trigger out), both exposed through `embedded-hal` pin traits so the
//! same driver runs against MCU GPIOs and host-side simulated pins.
//!
//! ## Edge classification
//!
//! The event engine never looks at raw levels.  Once per tick, before the
//! engine runs, [`TriggerIo::sample`] reads the input and classifies it
//! against the previous sample:
//!
//! | previous | current | edge      |
//! |----------|---------|-----------|
//! | low      | high    | `Rising`  |
//! | high     | low     | `Falling` |
//! | same     | same    | `Steady`  |
//!
//! The classification stays valid until the next `sample()`, so every rule
//! of one tick sees the same edge.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::load::TriggerEdge;

/// Level-to-edge classifier.
///
/// The first sample only establishes the baseline and reads as `Steady`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    last: Option<bool>,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Feed the level sampled this tick.
    pub fn update(&mut self, level: bool) -> TriggerEdge {
        let edge = match (self.last, level) {
            (Some(false), true) => TriggerEdge::Rising,
            (Some(true), false) => TriggerEdge::Falling,
            _ => TriggerEdge::Steady,
        };
        self.last = Some(level);
        edge
    }

    /// Last sampled level, if any.
    pub fn level(&self) -> Option<bool> {
        self.last
    }
}

/// Trigger input + output pins with a per-tick edge latch.
pub struct TriggerIo<I, O> {
    input: I,
    output: O,
    detector: EdgeDetector,
    edge: TriggerEdge,
    /// Level last written successfully; `None` until a write succeeds.
    output_level: Option<bool>,
}

impl<I: InputPin, O: OutputPin> TriggerIo<I, O> {
    /// Wrap the pins.  The output is driven low immediately.
    pub fn new(input: I, output: O) -> Self {
        let mut io = Self {
            input,
            output,
            detector: EdgeDetector::new(),
            edge: TriggerEdge::Steady,
            output_level: None,
        };
        io.set_output(false);
        io
    }

    /// Sample the input and latch this tick's edge classification.
    ///
    /// A failed pin read counts as "no change".
    pub fn sample(&mut self) -> TriggerEdge {
        self.edge = match self.input.is_high() {
            Ok(level) => self.detector.update(level),
            Err(_) => {
                warn!("trigger: input read failed, treating as steady");
                TriggerEdge::Steady
            }
        };
        self.edge
    }

    /// Edge latched by the last [`sample`](Self::sample).
    pub fn edge(&self) -> TriggerEdge {
        self.edge
    }

    /// Drive the trigger output.  Repeated writes of the same level are
    /// skipped; after a failed write the next one always reaches the pin.
    pub fn set_output(&mut self, level: bool) {
        if self.output_level == Some(level) {
            return;
        }
        let result = if level {
            self.output.set_high()
        } else {
            self.output.set_low()
        };
        match result {
            Ok(()) => self.output_level = Some(level),
            Err(_) => {
                self.output_level = None;
                warn!("trigger: output write failed");
            }
        }
    }

    /// Level last written to the output (low while unknown).
    pub fn output_level(&self) -> bool {
        self.output_level.unwrap_or(false)
    }
}
