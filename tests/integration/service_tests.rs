//! Integration tests for the EventService → SharedEngine → ports pipeline.

use super::mock_hw::{MockLoad, MockStore};

use eload::app::commands::EventCommand;
use eload::app::service::{AUTO_SAVE_DELAY_MS, EventService};
use eload::config::EventConfig;
use eload::error::{ConfigError, Error};
use eload::events::SharedEngine;
use eload::events::rules::{Destination, Rule, Source};
use eload::load::{Param, TriggerEdge};

type Engine = SharedEngine<8, 4>;

fn pulse_rule() -> Rule {
    Rule::new(Source::TriggerRising, Destination::TriggerHigh)
}

#[test]
fn start_applies_stored_config() {
    let engine = Engine::new();
    let mut config = EventConfig {
        tick_period_ms: 20,
        ..EventConfig::default()
    };
    config.push(5, pulse_rule()).unwrap();
    let store = MockStore::with(config);

    let mut svc = EventService::new(&engine);
    svc.start(&store).unwrap();

    let mut hw = MockLoad::new();
    hw.edge = TriggerEdge::Rising;
    assert_eq!(svc.tick(&mut hw), Ok(1));
    assert!(hw.trigger_high());
    assert_eq!(svc.tick_period_ms(), 20);
}

#[test]
fn start_rejects_config_that_does_not_fit() {
    let engine = Engine::new();
    let mut config = EventConfig::default();
    // Valid for the default table, slot 12 does not exist here.
    config.push(12, pulse_rule()).unwrap();
    let store = MockStore::with(config);

    let mut svc = EventService::new(&engine);
    assert!(matches!(svc.start(&store), Err(Error::Config(ConfigError::ValidationFailed(_)))));
    assert!(svc.current_config().unwrap().rules.is_empty());
}

#[test]
fn commands_drive_the_engine() {
    let engine = Engine::new();
    let store = MockStore::default();
    let mut svc = EventService::new(&engine);
    svc.start(&store).unwrap();

    svc.handle_command(
        EventCommand::ConfigureRule {
            slot: 0,
            rule: Rule::new(
                Source::TimerZero { timer: 1 },
                Destination::SetParam {
                    param: Param::CurrentSetpoint,
                    value: 750,
                },
            ),
        },
        &store,
    )
    .unwrap();
    svc.handle_command(EventCommand::ArmTimer { timer: 1, ticks: 2 }, &store)
        .unwrap();

    let mut hw = MockLoad::new();
    svc.tick(&mut hw).unwrap();
    assert_eq!(hw.params[Param::CurrentSetpoint.index()], 0);
    svc.tick(&mut hw).unwrap();
    assert_eq!(hw.params[Param::CurrentSetpoint.index()], 750);

    svc.handle_command(EventCommand::DisableRule(0), &store).unwrap();
    svc.handle_command(EventCommand::ArmTimer { timer: 1, ticks: 0 }, &store)
        .unwrap();
    hw.clear();
    svc.tick(&mut hw).unwrap();
    assert!(hw.calls.is_empty());
}

#[test]
fn out_of_range_commands_are_reported() {
    let engine = Engine::new();
    let store = MockStore::default();
    let mut svc = EventService::new(&engine);

    assert!(svc.handle_command(EventCommand::DisableRule(8), &store).is_err());
    assert!(svc.handle_command(EventCommand::StopTimer(4), &store).is_err());
    assert!(svc
        .handle_command(EventCommand::ArmTimer { timer: 4, ticks: 1 }, &store)
        .is_err());
    assert!(!svc.is_config_dirty());
}

#[test]
fn save_and_reload_round_trip() {
    let engine = Engine::new();
    let store = MockStore::default();
    let mut svc = EventService::new(&engine);

    svc.handle_command(EventCommand::ConfigureRule { slot: 3, rule: pulse_rule() }, &store)
        .unwrap();
    svc.handle_command(EventCommand::SaveConfig, &store).unwrap();
    assert_eq!(store.saves.get(), 1);

    svc.handle_command(EventCommand::Reset, &store).unwrap();
    assert!(svc.current_config().unwrap().rules.is_empty());
    assert!(svc.is_config_dirty());

    svc.handle_command(EventCommand::LoadConfig, &store).unwrap();
    assert!(!svc.is_config_dirty());
    let config = svc.current_config().unwrap();
    assert_eq!(config.rules.len(), 1);
    assert_eq!(config.rules[0].slot, 3);
}

#[test]
fn load_without_stored_config_fails() {
    let engine = Engine::new();
    let mut svc = EventService::new(&engine);
    assert_eq!(
        svc.handle_command(EventCommand::LoadConfig, &MockStore::default()),
        Err(Error::Config(ConfigError::NotFound))
    );
}

#[test]
fn auto_save_respects_tick_period() {
    let engine = Engine::new();
    let store = MockStore::default();
    let mut svc = EventService::new(&engine);

    let config = EventConfig {
        tick_period_ms: 100,
        ..EventConfig::default()
    };
    svc.handle_command(EventCommand::ApplyConfig(config), &store).unwrap();
    assert!(svc.is_config_dirty());

    let ticks = AUTO_SAVE_DELAY_MS / 100;
    let mut hw = MockLoad::new();
    for _ in 0..ticks - 1 {
        svc.tick(&mut hw).unwrap();
        assert!(!svc.auto_save_if_needed(&store));
    }
    svc.tick(&mut hw).unwrap();
    assert!(svc.auto_save_if_needed(&store));
    assert_eq!(store.stored.borrow().as_ref().unwrap().tick_period_ms, 100);
}

#[test]
fn failed_auto_save_stays_dirty() {
    let engine = Engine::new();
    let store = MockStore::default();
    store.fail_saves.set(true);
    let mut svc = EventService::new(&engine);
    svc.handle_command(EventCommand::Reset, &store).unwrap();

    let mut hw = MockLoad::new();
    for _ in 0..1_000 {
        svc.tick(&mut hw).unwrap();
    }
    assert!(!svc.auto_save_if_needed(&store));
    assert!(svc.is_config_dirty());
}
