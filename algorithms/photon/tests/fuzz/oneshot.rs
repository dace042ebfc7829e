use bolero::check;
use photon::kernels::portable;

#[test]
fn fuzz_dispatched_matches_portable() {
    check!()
        .with_type::<(Vec<u8>, u64)>()
        .for_each(|(data, seed)| {
            assert_eq!(
                photon::hash_seeded(data, *seed),
                portable::hash(data, *seed),
                "hash diverged from the reference kernel"
            );
            assert_eq!(
                photon::bytesum(data),
                portable::bytesum(data),
                "bytesum diverged from the reference kernel"
            );
        });
}

#[test]
fn fuzz_generator_matches_portable() {
    check!().with_type::<(u8, u64)>().for_each(|(length, nonce)| {
        let mut dispatched = vec![0u8; *length as usize];
        let mut reference = vec![0u8; *length as usize];
        photon::fill_random(&mut dispatched, *nonce);
        portable::fill_random(&mut reference, *nonce);
        assert_eq!(dispatched, reference);
    });
}
