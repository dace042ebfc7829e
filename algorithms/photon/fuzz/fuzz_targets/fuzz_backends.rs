#![no_main]

use libfuzzer_sys::fuzz_target;
use photon::kernels::portable;

fuzz_target!(|data: &[u8]| {
    let seed = data.first().copied().map_or(0, u64::from);

    assert_eq!(
        photon::hash_seeded(data, seed),
        portable::hash(data, seed),
        "dispatched hash diverged from the reference kernel"
    );
    assert_eq!(
        photon::bytesum(data),
        portable::bytesum(data),
        "dispatched bytesum diverged from the reference kernel"
    );

    let length = data.len().min(300);
    let mut dispatched = vec![0u8; length];
    let mut reference = vec![0u8; length];
    photon::fill_random(&mut dispatched, seed);
    portable::fill_random(&mut reference, seed);
    assert_eq!(dispatched, reference, "generator diverged");
});
