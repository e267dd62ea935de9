//! Port traits: the boundary between the event engine and the load hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EventEngine (domain)
//! ```
//!
//! Driven adapters (the analog board, the trigger connector, the
//! configuration store) implement these traits.  The
//! [`EventEngine`](crate::events::EventEngine) consumes them via generics,
//! so the engine never touches SPI, GPIO or flash directly.
//!
//! Implementations are called from the tick context.  They must not block,
//! and any state they share with another execution context must be
//! protected by the implementation itself.

use crate::config::EventConfig;
use crate::error::ConfigError;
use crate::load::{LoadMode, Param, TriggerEdge, Value};

// ───────────────────────────────────────────────────────────────
// Load port (driven adapter: domain ↔ analog board + trigger connector)
// ───────────────────────────────────────────────────────────────

/// Trigger I/O and operating-mode control.
pub trait LoadPort {
    /// Drive the trigger output connector high (`true`) or low.
    fn set_trigger_output(&mut self, level: bool);

    /// Edge classification of the trigger input for the current tick.
    fn trigger_input_edge(&self) -> TriggerEdge;

    /// Switch the current sink to a new regulation mode.
    fn set_mode(&mut self, mode: LoadMode);

    /// Disable the current sink.
    fn load_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Parameter port (driven adapter: domain ↔ setpoints / measurements)
// ───────────────────────────────────────────────────────────────

/// Capability to read and write the load's numeric parameters.
///
/// Rules name parameters by identity; the owner of the values resolves
/// them here, so a rule can never outlive what it points at.
pub trait ParameterPort {
    /// Current value of `param`.  Must always be fresh, never cached.
    fn read(&self, param: Param) -> Value;

    /// Overwrite `param`.  Only called for writable parameters.
    fn write(&mut self, param: Param, value: Value);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the event configuration.
///
/// Implementations MUST validate before persisting.  Invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ConfigError::NotFound`] if nothing has been stored yet.
    fn load(&self) -> Result<EventConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &EventConfig) -> Result<(), ConfigError>;
}
