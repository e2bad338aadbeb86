#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let seed = u64::try_from(input.len()).unwrap_or(u64::MAX);
        let rendered = stochast::fuzzing::render_template_input(input, seed);
        if !input.contains("{{") {
            debug_assert_eq!(rendered, input);
        }
    }
});
