//! Fuzz target: arbitrary rule tables under arbitrary inputs
//!
//! The first bytes build rules (4 bytes each: source tag, destination tag,
//! two operands); the rest drive ticks (one byte each: trigger edge and a
//! parameter value).  Configuration may be rejected, ticks must never
//! panic.
//!
//! cargo fuzz run fuzz_rule_table

#![no_main]

use eload::app::ports::{LoadPort, ParameterPort};
use eload::events::rules::{Destination, Rule, Source};
use eload::events::EventEngine;
use eload::load::{LoadMode, Param, TriggerEdge, Value};
use libfuzzer_sys::fuzz_target;

const EVENTS: usize = 8;
const TIMERS: usize = 4;

#[derive(Default)]
struct Sink {
    params: [Value; Param::COUNT],
    edge: TriggerEdge,
}

impl LoadPort for Sink {
    fn set_trigger_output(&mut self, _level: bool) {}
    fn trigger_input_edge(&self) -> TriggerEdge {
        self.edge
    }
    fn set_mode(&mut self, _mode: LoadMode) {}
    fn load_off(&mut self) {}
}

impl ParameterPort for Sink {
    fn read(&self, param: Param) -> Value {
        self.params[param.index()]
    }
    fn write(&mut self, param: Param, value: Value) {
        self.params[param.index()] = value;
    }
}

fn param(b: u8) -> Param {
    Param::ALL[b as usize % Param::COUNT]
}

fn source(tag: u8, a: u8, b: u8) -> Source {
    match tag % 6 {
        0 => Source::Disabled,
        1 => Source::TimerZero { timer: a },
        2 => Source::ParamAbove { param: param(a), limit: Value::from(b) * 100 },
        3 => Source::ParamBelow { param: param(a), limit: Value::from(b) * 100 },
        4 => Source::TriggerFalling,
        _ => Source::TriggerRising,
    }
}

fn destination(tag: u8, a: u8, b: u8) -> Destination {
    match tag % 7 {
        0 => Destination::None,
        1 => Destination::SetParam { param: param(a), value: Value::from(b) * 100 },
        2 => Destination::ArmTimer { timer: a, ticks: u32::from(b) },
        3 => Destination::TriggerHigh,
        4 => Destination::TriggerLow,
        5 => Destination::SetMode(LoadMode::ConstantVoltage),
        _ => Destination::LoadOff,
    }
}

fuzz_target!(|data: &[u8]| {
    let split = (EVENTS * 4).min(data.len());
    let (table, inputs) = data.split_at(split);

    let mut engine = EventEngine::<EVENTS, TIMERS>::new();
    for (slot, chunk) in table.chunks_exact(4).enumerate() {
        let s = source(chunk[0], chunk[2], chunk[3]);
        let d = destination(chunk[1], chunk[2], chunk[3]);
        let _ = engine.configure_rule(slot, Rule::new(s, d));
    }

    let mut hw = Sink::default();
    for &b in inputs {
        hw.edge = match b & 0x03 {
            1 => TriggerEdge::Rising,
            2 => TriggerEdge::Falling,
            _ => TriggerEdge::Steady,
        };
        hw.params[param(b >> 2).index()] = Value::from(b) * 50;
        let fired = engine.tick(&mut hw);
        assert!(fired <= EVENTS);
    }
});
