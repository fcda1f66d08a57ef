use robemax_core::rng::{derive_substream_seed, RngHandle};
use rand::RngCore;

#[test]
fn rng_emits_reproducible_sequence() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1234);

    let seq_a: Vec<u64> = (0..100).map(|_| rng_a.next_u64()).collect();
    let seq_b: Vec<u64> = (0..100).map(|_| rng_b.next_u64()).collect();

    assert_eq!(seq_a, seq_b);
}

#[test]
fn substreams_differ_per_period() {
    assert_ne!(derive_substream_seed(7, 0), derive_substream_seed(7, 1));
    assert_eq!(derive_substream_seed(7, 3), derive_substream_seed(7, 3));
}

#[test]
fn sampled_indices_are_sorted_distinct_and_bounded() {
    let mut rng = RngHandle::for_substream(99, 4);
    let indices = rng.sample_indices(50, 12);
    assert_eq!(indices.len(), 12);
    assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(indices.iter().all(|&index| index < 50));

    let mut again = RngHandle::for_substream(99, 4);
    assert_eq!(again.sample_indices(50, 12), indices);
}

#[test]
fn sampling_more_than_available_returns_everything() {
    let mut rng = RngHandle::from_seed(1);
    assert_eq!(rng.sample_indices(5, 10), vec![0, 1, 2, 3, 4]);
}
