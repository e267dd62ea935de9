//! End-to-end tests: demo preset on the simulated load with real trigger
//! pins and the postcard-backed config store.

use eload::adapters::config_store::ConfigStore;
use eload::adapters::sim_load::{SimPin, SimulatedLoad, SourceModel};
use eload::app::ports::{ConfigPort, ParameterPort};
use eload::app::service::EventService;
use eload::config::EventConfig;
use eload::drivers::trigger::TriggerIo;
use eload::events::{MAX_EVENTS, MAX_TIMERS, SharedEngine};
use eload::load::Param;

struct Rig {
    input: SimPin,
    output: SimPin,
    hw: SimulatedLoad<SimPin, SimPin>,
}

fn rig() -> Rig {
    let input = SimPin::new(false);
    let output = SimPin::new(false);
    let mut hw = SimulatedLoad::new(TriggerIo::new(input.clone(), output.clone()), SourceModel::default());
    hw.write(Param::CurrentSetpoint, 500);
    hw.enable();
    Rig { input, output, hw }
}

fn demo_store() -> ConfigStore {
    let store = ConfigStore::new();
    store.save(&EventConfig::demo()).unwrap();
    store
}

fn step(svc: &mut EventService<'_, MAX_EVENTS, MAX_TIMERS>, rig: &mut Rig) {
    rig.hw.sample();
    svc.tick(&mut rig.hw).unwrap();
}

#[test]
fn trigger_pulse_raises_current_then_restores() {
    let engine = SharedEngine::<MAX_EVENTS, MAX_TIMERS>::new();
    let store = demo_store();
    let mut svc = EventService::new(&engine);
    svc.start(&store).unwrap();
    let mut rig = rig();

    step(&mut svc, &mut rig);
    rig.input.set(true);
    step(&mut svc, &mut rig);
    assert_eq!(rig.hw.read(Param::CurrentSetpoint), 2_000);

    for _ in 0..99 {
        step(&mut svc, &mut rig);
    }
    assert_eq!(rig.hw.read(Param::CurrentSetpoint), 2_000);
    step(&mut svc, &mut rig);
    assert_eq!(rig.hw.read(Param::CurrentSetpoint), 500);
}

#[test]
fn short_circuit_drives_trigger_output() {
    let engine = SharedEngine::<MAX_EVENTS, MAX_TIMERS>::new();
    let store = demo_store();
    let mut svc = EventService::new(&engine);
    svc.start(&store).unwrap();
    let mut rig = rig();

    step(&mut svc, &mut rig);
    assert!(!rig.output.level());

    rig.hw.set_source(SourceModel {
        open_circuit_mv: 0,
        ..SourceModel::default()
    });
    step(&mut svc, &mut rig);
    assert!(rig.output.level());

    rig.hw.set_source(SourceModel::default());
    step(&mut svc, &mut rig);
    assert!(!rig.output.level());
}

#[test]
fn over_temperature_turns_load_off() {
    let engine = SharedEngine::<MAX_EVENTS, MAX_TIMERS>::new();
    let store = demo_store();
    let mut svc = EventService::new(&engine);
    svc.start(&store).unwrap();
    let mut rig = rig();

    step(&mut svc, &mut rig);
    assert!(rig.hw.is_enabled());
    rig.hw.set_temperature(90_000);
    step(&mut svc, &mut rig);
    assert!(!rig.hw.is_enabled());
    assert_eq!(rig.hw.read(Param::MeasuredCurrent), 0);
}

#[test]
fn corrupted_page_leaves_engine_inert() {
    let engine = SharedEngine::<MAX_EVENTS, MAX_TIMERS>::new();
    let store = ConfigStore::with_page(vec![0x80; 8]);
    let mut svc = EventService::new(&engine);
    assert!(svc.start(&store).is_err());

    // The service keeps ticking with every rule disabled.
    let mut rig = rig();
    rig.hw.set_temperature(90_000);
    step(&mut svc, &mut rig);
    assert!(rig.hw.is_enabled());
    assert_eq!(svc.tick_count(), 1);
}
