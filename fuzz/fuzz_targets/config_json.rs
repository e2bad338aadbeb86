#![no_main]

use libfuzzer_sys::fuzz_target;
use stochast::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<ConfigFile>(data) else {
        return;
    };
    if let Ok(run) = stochast::fuzzing::apply_config_input(&config) {
        debug_assert!(!run.duration().is_zero());
        debug_assert!(!run.sleep_unit().is_zero());
    }
});
