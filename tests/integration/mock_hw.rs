//! Mock hardware adapter for integration tests.
//!
//! Records every load call so tests can assert on the full command
//! history without touching real DAC/GPIO registers.

use eload::app::ports::{ConfigPort, LoadPort, ParameterPort};
use eload::config::EventConfig;
use eload::error::ConfigError;
use eload::load::{LoadMode, Param, TriggerEdge, Value};
use std::cell::{Cell, RefCell};

// ── Load call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCall {
    TriggerOutput(bool),
    SetMode(LoadMode),
    LoadOff,
    Write(Param, Value),
}

// ── MockLoad ──────────────────────────────────────────────────

pub struct MockLoad {
    pub calls: Vec<LoadCall>,
    pub params: [Value; Param::COUNT],
    pub edge: TriggerEdge,
}

#[allow(dead_code)]
impl MockLoad {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            params: [0; Param::COUNT],
            edge: TriggerEdge::Steady,
        }
    }

    pub fn set(&mut self, param: Param, value: Value) {
        self.params[param.index()] = value;
    }

    /// Level of the trigger output after the last write (low if never
    /// written).
    pub fn trigger_high(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                LoadCall::TriggerOutput(level) => Some(*level),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn trigger_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, LoadCall::TriggerOutput(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockLoad {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadPort for MockLoad {
    fn set_trigger_output(&mut self, level: bool) {
        self.calls.push(LoadCall::TriggerOutput(level));
    }

    fn trigger_input_edge(&self) -> TriggerEdge {
        self.edge
    }

    fn set_mode(&mut self, mode: LoadMode) {
        self.calls.push(LoadCall::SetMode(mode));
    }

    fn load_off(&mut self) {
        self.calls.push(LoadCall::LoadOff);
    }
}

impl ParameterPort for MockLoad {
    fn read(&self, param: Param) -> Value {
        self.params[param.index()]
    }

    fn write(&mut self, param: Param, value: Value) {
        self.calls.push(LoadCall::Write(param, value));
        self.params[param.index()] = value;
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// In-memory [`ConfigPort`] that counts saves.
#[derive(Default)]
pub struct MockStore {
    pub stored: RefCell<Option<EventConfig>>,
    pub saves: Cell<usize>,
    pub fail_saves: Cell<bool>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn with(config: EventConfig) -> Self {
        Self {
            stored: RefCell::new(Some(config)),
            ..Self::default()
        }
    }
}

impl ConfigPort for MockStore {
    fn load(&self) -> Result<EventConfig, ConfigError> {
        self.stored.borrow().clone().ok_or(ConfigError::NotFound)
    }

    fn save(&self, config: &EventConfig) -> Result<(), ConfigError> {
        if self.fail_saves.get() {
            return Err(ConfigError::IoError);
        }
        config.validate()?;
        self.saves.set(self.saves.get() + 1);
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}
