//! Load-side vocabulary shared by the event engine and its collaborators.
//!
//! These types name things the load controller owns: numeric parameters,
//! operating modes, and the per-tick trigger-input classification.  The
//! engine only ever refers to them by identity; reading and writing the
//! underlying values is the job of the port implementations.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Numeric parameter value in the load's native units
/// (mA, mV, mΩ, mW, m°C).
pub type Value = i32;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Numeric values exposed by the load controller.
///
/// Setpoints are writable by rule destinations; measurements are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Param {
    /// Constant-current setpoint (mA).
    CurrentSetpoint = 0,
    /// Constant-voltage setpoint (mV).
    VoltageSetpoint = 1,
    /// Constant-resistance setpoint (mΩ).
    ResistanceSetpoint = 2,
    /// Constant-power setpoint (mW).
    PowerSetpoint = 3,
    /// Sink current as measured by the ADC (mA).
    MeasuredCurrent = 4,
    /// Terminal voltage as measured by the ADC (mV).
    MeasuredVoltage = 5,
    /// Product of the two measurements (mW).
    MeasuredPower = 6,
    /// Heatsink temperature (m°C).
    Temperature = 7,
}

impl Param {
    /// Total number of parameters, used to size parameter stores.
    pub const COUNT: usize = 8;

    /// Every parameter, in discriminant order.
    pub const ALL: [Param; Self::COUNT] = [
        Self::CurrentSetpoint,
        Self::VoltageSetpoint,
        Self::ResistanceSetpoint,
        Self::PowerSetpoint,
        Self::MeasuredCurrent,
        Self::MeasuredVoltage,
        Self::MeasuredPower,
        Self::Temperature,
    ];

    /// Position of this parameter in [`Param::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether a rule destination may write this parameter.
    pub const fn is_writable(self) -> bool {
        matches!(
            self,
            Self::CurrentSetpoint
                | Self::VoltageSetpoint
                | Self::ResistanceSetpoint
                | Self::PowerSetpoint
        )
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentSetpoint => write!(f, "current setpoint"),
            Self::VoltageSetpoint => write!(f, "voltage setpoint"),
            Self::ResistanceSetpoint => write!(f, "resistance setpoint"),
            Self::PowerSetpoint => write!(f, "power setpoint"),
            Self::MeasuredCurrent => write!(f, "measured current"),
            Self::MeasuredVoltage => write!(f, "measured voltage"),
            Self::MeasuredPower => write!(f, "measured power"),
            Self::Temperature => write!(f, "temperature"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

/// Regulation mode of the current sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadMode {
    #[default]
    ConstantCurrent,
    ConstantVoltage,
    ConstantResistance,
    ConstantPower,
}

impl LoadMode {
    /// The setpoint parameter that this mode regulates against.
    pub const fn setpoint(self) -> Param {
        match self {
            Self::ConstantCurrent => Param::CurrentSetpoint,
            Self::ConstantVoltage => Param::VoltageSetpoint,
            Self::ConstantResistance => Param::ResistanceSetpoint,
            Self::ConstantPower => Param::PowerSetpoint,
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantCurrent => write!(f, "CC"),
            Self::ConstantVoltage => write!(f, "CV"),
            Self::ConstantResistance => write!(f, "CR"),
            Self::ConstantPower => write!(f, "CP"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trigger input
// ---------------------------------------------------------------------------

/// Classification of the trigger input for the current tick.
///
/// Produced by the hardware side (see
/// [`EdgeDetector`](crate::drivers::trigger::EdgeDetector)); the engine
/// never tracks previous levels itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerEdge {
    /// The input went from low to high since the previous tick.
    Rising,
    /// The input went from high to low since the previous tick.
    Falling,
    /// No level change.
    #[default]
    Steady,
}
