use bolero::check;
use photon::{hash, Hasher};

#[test]
fn fuzz_streaming_consistency() {
    check!().with_type::<Vec<u8>>().for_each(|data| {
        let expected = hash(data);

        // Single update.
        let mut hasher = Hasher::new();
        hasher.update(data);
        assert_eq!(hasher.finish(), expected, "single update mismatch");

        // Byte by byte, small inputs only.
        if data.len() < 256 {
            let mut hasher = Hasher::new();
            for byte in data {
                hasher.update(&[*byte]);
            }
            assert_eq!(hasher.finish(), expected, "byte-by-byte mismatch");
        }

        // A few fixed split points.
        if data.len() > 1 {
            for split in [1, data.len() / 2, data.len() - 1] {
                let mut hasher = Hasher::new();
                let (first, second) = data.split_at(split);
                hasher.update(first);
                hasher.update(second);
                assert_eq!(hasher.finish(), expected, "split at {split} mismatch");
            }
        }
    });
}
