#![no_main]

use libfuzzer_sys::fuzz_target;
use stochast::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let Ok(config) = toml::from_str::<ConfigFile>(input) else {
            return;
        };
        if let Ok(run) = stochast::fuzzing::apply_config_input(&config) {
            debug_assert!(run.user_count() > 0);
            debug_assert!(run.sleep_range().min() <= run.sleep_range().max());
            debug_assert!((0.0..=1.0).contains(&run.probability().get()));
        }
    }
});
