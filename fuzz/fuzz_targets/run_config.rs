#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut bytes = [0u8; 24];
    for (slot, byte) in bytes.iter_mut().zip(data) {
        *slot = *byte;
    }
    let [u0, u1, d0, d1, p0, p1, min0, min1, max0, max1, s0, s1, s2, s3, s4, s5, s6, s7, ..] =
        bytes;
    let users = usize::from(u16::from_le_bytes([u0, u1]));
    let duration_ms = u64::from(u16::from_le_bytes([d0, d1]));
    let probability = f64::from(u16::from_le_bytes([p0, p1])) / 60_000.0;
    let sleep_min = u32::from(u16::from_le_bytes([min0, min1]));
    let sleep_max = u32::from(u16::from_le_bytes([max0, max1]));
    let seed = u64::from_le_bytes([s0, s1, s2, s3, s4, s5, s6, s7]);

    if let Ok(drawn) = stochast::fuzzing::build_run_config_input(
        users,
        duration_ms,
        probability,
        (sleep_min, sleep_max),
        seed,
    ) {
        debug_assert!(users > 0 && duration_ms > 0);
        debug_assert!((sleep_min..=sleep_max).contains(&drawn));
    }
});
