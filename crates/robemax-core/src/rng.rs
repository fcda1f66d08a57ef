//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle used wherever the workspace needs randomness.
///
/// A master `seed: u64` must be provided by the caller. Per-period streams are
/// derived by hashing `(master_seed, substream_id)` with SipHash-1-3 keyed with
/// zeros, so the same seed selects the same interpolation points on every
/// platform.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the handle for a substream of `master_seed`.
    pub fn for_substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Draws `amount` distinct indices from `0..length`, returned in ascending order.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(length);
        let mut indices = rand::seq::index::sample(&mut self.rng, length, amount).into_vec();
        indices.sort_unstable();
        indices
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
