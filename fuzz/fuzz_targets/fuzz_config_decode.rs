//! Fuzz target: stored configuration page
//!
//! Feeds arbitrary bytes through the same path a boot takes: postcard
//! decode, validation, then `apply_config`.  Nothing may panic, and an
//! accepted config must export back to an equal one.
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use eload::config::EventConfig;
use eload::events::DefaultEngine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = postcard::from_bytes::<EventConfig>(data) else {
        return;
    };

    let mut engine = DefaultEngine::new();
    match engine.apply_config(&config) {
        Ok(()) => {
            assert!(config.validate().is_ok());
            let exported = engine
                .to_config(config.tick_period_ms)
                .expect("applied config must export");
            // Export lists enabled slots in index order.
            for entry in &exported.rules {
                assert!(config.rules.iter().any(|e| e == entry));
            }
        }
        Err(_) => assert!(config.validate().is_err()),
    }
});
