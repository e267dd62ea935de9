//! eLoad event engine: host simulation entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedLoad                       ConfigStore               │
//! │  (LoadPort + ParameterPort)          (ConfigPort, postcard)    │
//! │    └─ TriggerIo<SimPin, SimPin>                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   EventService ──▶ static SharedEngine (pure logic)    │    │
//! │  │   rules · timers · tick                                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `eload-sim [TICKS]` (default 1000).  `RUST_LOG` selects the log
//! level; `debug` shows every fired rule.
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use eload::adapters::config_store::ConfigStore;
use eload::adapters::sim_load::{SimPin, SimulatedLoad, SourceModel};
use eload::app::ports::{ConfigPort, ParameterPort};
use eload::app::service::EventService;
use eload::config::EventConfig;
use eload::drivers::trigger::TriggerIo;
use eload::error::ConfigError;
use eload::events::{MAX_EVENTS, MAX_TIMERS, SharedEngine};
use eload::load::Param;

/// The firmware's one event engine, shared with the tick context.
static ENGINE: SharedEngine<MAX_EVENTS, MAX_TIMERS> = SharedEngine::new();

/// Default simulation length.
const DEFAULT_TICKS: u64 = 1_000;

/// The external trigger input toggles this often (ticks).
const TRIGGER_TOGGLE_TICKS: u64 = 250;

/// A short across the terminals is applied in this tick window.
const SHORT_WINDOW: core::ops::Range<u64> = 600..650;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  eLoad sim v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let ticks = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid tick count '{arg}'"))?,
        None => DEFAULT_TICKS,
    };

    // ── 2. Configuration store (seed on first boot) ───────────
    let store = ConfigStore::new();
    match store.load() {
        Ok(_) => {}
        Err(ConfigError::NotFound) => {
            info!("No stored config, seeding demo preset");
            store
                .save(&EventConfig::demo())
                .context("failed to seed demo config")?;
        }
        Err(e) => warn!("Stored config unusable: {e}"),
    }

    // ── 3. Hardware adapters ──────────────────────────────────
    let trigger_in = SimPin::new(false);
    let trigger_out = SimPin::new(false);
    let trigger = TriggerIo::new(trigger_in.clone(), trigger_out.clone());
    let mut hw = SimulatedLoad::new(trigger, SourceModel::default());
    hw.write(Param::CurrentSetpoint, 500);
    hw.enable();

    // ── 4. Event service ──────────────────────────────────────
    let mut service = EventService::new(&ENGINE);
    if let Err(e) = service.start(&store) {
        warn!("Event service started inert: {e}");
    }
    let period = Duration::from_millis(u64::from(service.tick_period_ms()));
    info!("Running {ticks} ticks at {} ms", service.tick_period_ms());

    // ── 5. Tick loop ──────────────────────────────────────────
    let mut fired_total = 0usize;
    for n in 1..=ticks {
        if n % TRIGGER_TOGGLE_TICKS == 0 {
            trigger_in.set(!trigger_in.level());
            info!("tick {n}: trigger input -> {}", u8::from(trigger_in.level()));
        }
        if n == SHORT_WINDOW.start {
            info!("tick {n}: terminals shorted");
            hw.set_source(SourceModel {
                open_circuit_mv: 0,
                ..SourceModel::default()
            });
        } else if n == SHORT_WINDOW.end {
            info!("tick {n}: short removed");
            hw.set_source(SourceModel::default());
        }

        hw.sample();
        let was_high = trigger_out.level();
        fired_total += service.tick(&mut hw)?;
        if trigger_out.level() != was_high {
            info!("tick {n}: trigger output -> {}", u8::from(trigger_out.level()));
        }

        service.auto_save_if_needed(&store);
        thread::sleep(period);
    }

    // ── 6. Summary ────────────────────────────────────────────
    info!(
        "Done: {} ticks, {fired_total} rule firings, load {} ({}), I={} mA V={} mV",
        service.tick_count(),
        if hw.is_enabled() { "on" } else { "off" },
        hw.mode(),
        hw.read(Param::MeasuredCurrent),
        hw.read(Param::MeasuredVoltage),
    );
    Ok(())
}
