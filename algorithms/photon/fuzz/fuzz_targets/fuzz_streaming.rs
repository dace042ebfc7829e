#![no_main]

use libfuzzer_sys::fuzz_target;
use photon::Hasher;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // Chunk size and seed are derived from the input's first bytes.
    let chunk_size = (data[0] as usize % 255) + 1;
    let seed = u64::from(data[0]) << 32 | u64::from(data.len() as u32);

    let reference = photon::hash_seeded(data, seed);

    let mut hasher = Hasher::with_seed(seed);
    for chunk in data.chunks(chunk_size) {
        hasher.update(chunk);
    }

    assert_eq!(
        reference,
        hasher.finish(),
        "streaming and one-shot approaches differ"
    );
});
