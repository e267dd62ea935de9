//! Simulated load adapter: bridges a host-side load model to the port traits.
//!
//! Stands in for the analog board (DAC setpoint, ADC measurements) and owns
//! the trigger connector driver, exposing both through [`LoadPort`] and
//! [`ParameterPort`].  The device under test is modelled as a voltage
//! source with a series resistance:
//!
//! ```text
//!   ┌──[ R_int ]──┬──────▶ I
//!  (V_src)        │      load
//!   └─────────────┴──────
//! ```

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::info;

use crate::app::ports::{LoadPort, ParameterPort};
use crate::drivers::trigger::TriggerIo;
use crate::load::{LoadMode, Param, TriggerEdge, Value};

// ── Simulated pin ─────────────────────────────────────────────

/// Shared-level GPIO for host simulation.  Clones observe the same level.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<Cell<bool>>);

impl SimPin {
    pub fn new(level: bool) -> Self {
        Self(Rc::new(Cell::new(level)))
    }

    pub fn level(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, level: bool) {
        self.0.set(level);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

// ── Device under test ─────────────────────────────────────────

/// Source connected to the load terminals.
#[derive(Debug, Clone, Copy)]
pub struct SourceModel {
    /// Open-circuit voltage (mV).
    pub open_circuit_mv: Value,
    /// Series resistance (mΩ).
    pub internal_mohm: Value,
}

impl Default for SourceModel {
    fn default() -> Self {
        Self {
            open_circuit_mv: 12_000,
            internal_mohm: 500,
        }
    }
}

// ── SimulatedLoad ─────────────────────────────────────────────

/// Concrete adapter that combines the load model and trigger I/O behind
/// the port traits.
pub struct SimulatedLoad<I, O> {
    trigger: TriggerIo<I, O>,
    source: SourceModel,
    params: [Value; Param::COUNT],
    mode: LoadMode,
    enabled: bool,
}

impl<I: InputPin, O: OutputPin> SimulatedLoad<I, O> {
    pub fn new(trigger: TriggerIo<I, O>, source: SourceModel) -> Self {
        let mut load = Self {
            trigger,
            source,
            params: [0; Param::COUNT],
            mode: LoadMode::default(),
            enabled: false,
        };
        load.params[Param::Temperature.index()] = 25_000;
        load.update_measurements();
        load
    }

    /// Start the sink in its current mode.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.update_measurements();
        info!("SimLoad: enabled ({})", self.mode);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    pub fn trigger_output(&self) -> bool {
        self.trigger.output_level()
    }

    /// Inject a heatsink temperature (m°C).
    pub fn set_temperature(&mut self, milli_celsius: Value) {
        self.params[Param::Temperature.index()] = milli_celsius;
    }

    /// Replace the device under test.
    pub fn set_source(&mut self, source: SourceModel) {
        self.source = source;
        self.update_measurements();
    }

    /// Per-tick hardware step: sample the trigger input and refresh the
    /// measurements.  Call before the engine tick.
    pub fn sample(&mut self) -> TriggerEdge {
        self.update_measurements();
        self.trigger.sample()
    }

    fn update_measurements(&mut self) {
        let current_ma = if self.enabled { self.regulated_current() } else { 0 };
        let voltage_mv = self.terminal_voltage(current_ma);
        let power_mw = saturate(i128::from(voltage_mv) * i128::from(current_ma) / 1000);

        self.params[Param::MeasuredCurrent.index()] = current_ma;
        self.params[Param::MeasuredVoltage.index()] = voltage_mv;
        self.params[Param::MeasuredPower.index()] = power_mw;
    }

    /// Current drawn in the active mode, limited by the short-circuit current.
    ///
    /// A reversed-polarity source drives no current; negative setpoints
    /// read as zero.
    fn regulated_current(&self) -> Value {
        let voc = i128::from(self.source.open_circuit_mv.max(0));
        let r_int = i128::from(self.source.internal_mohm.max(1));
        let i_max = voc * 1000 / r_int;
        let setpoint = i128::from(self.params[self.mode.setpoint().index()].max(0));

        let i = match self.mode {
            LoadMode::ConstantCurrent => setpoint,
            LoadMode::ConstantVoltage => (voc - setpoint) * 1000 / r_int,
            LoadMode::ConstantResistance => voc * 1000 / (r_int + setpoint.max(1)),
            LoadMode::ConstantPower => {
                // I = P / V at the operating point, solved for V = Voc - I·R.
                let disc = voc * voc - 4 * r_int * setpoint;
                if disc < 0 {
                    i_max / 2
                } else {
                    (voc - disc.isqrt()) * 1000 / (2 * r_int)
                }
            }
        };
        saturate(i.clamp(0, i_max))
    }

    fn terminal_voltage(&self, current_ma: Value) -> Value {
        let drop = i128::from(current_ma) * i128::from(self.source.internal_mohm.max(0)) / 1000;
        saturate((i128::from(self.source.open_circuit_mv) - drop).max(0))
    }
}

/// Narrow a model quantity to a [`Value`], saturating at the `i32` limits.
fn saturate(v: i128) -> Value {
    Value::try_from(v).unwrap_or(if v < 0 { Value::MIN } else { Value::MAX })
}

// ── LoadPort implementation ───────────────────────────────────

impl<I: InputPin, O: OutputPin> LoadPort for SimulatedLoad<I, O> {
    fn set_trigger_output(&mut self, level: bool) {
        self.trigger.set_output(level);
    }

    fn trigger_input_edge(&self) -> TriggerEdge {
        self.trigger.edge()
    }

    fn set_mode(&mut self, mode: LoadMode) {
        if mode != self.mode {
            info!("SimLoad: mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        self.update_measurements();
    }

    fn load_off(&mut self) {
        if self.enabled {
            info!("SimLoad: disabled");
        }
        self.enabled = false;
        self.update_measurements();
    }
}

// ── ParameterPort implementation ──────────────────────────────

impl<I: InputPin, O: OutputPin> ParameterPort for SimulatedLoad<I, O> {
    fn read(&self, param: Param) -> Value {
        self.params[param.index()]
    }

    fn write(&mut self, param: Param, value: Value) {
        if !param.is_writable() {
            return;
        }
        self.params[param.index()] = value;
        self.update_measurements();
    }
}
