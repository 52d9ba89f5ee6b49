//! Benchmark inputs for the Pliant container.
//!
//! Every generator is seeded so runs are comparable:
//!
//! - [`random_values`]: `n` pseudo-random `u64`s from a ChaCha8 stream
//! - [`shared_prefix_pair`]: two vectors equal up to a chosen index
//! - [`filled_vector`]: a [`Vector`] built by repeated `push_back`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pliant::{VecError, Vector};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate `n` deterministic pseudo-random values from `seed`.
pub fn random_values(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.next_u64()).collect()
}

/// Build a vector of `n` random values by pushing one at a time.
pub fn filled_vector(n: usize, seed: u64) -> Result<Vector<u64>, VecError> {
    let mut v = Vector::new();
    for value in random_values(n, seed) {
        v.push_back(value)?;
    }
    Ok(v)
}

/// Two `len`-element vectors that agree everywhere before `diverge_at`
/// and differ at it (when `diverge_at < len`).
pub fn shared_prefix_pair(
    len: usize,
    diverge_at: usize,
    seed: u64,
) -> Result<(Vector<u64>, Vector<u64>), VecError> {
    let left = Vector::from_slice(&random_values(len, seed))?;
    let mut right = left.clone();
    if let Ok(slot) = right.at_mut(diverge_at) {
        *slot = slot.wrapping_add(1);
    }
    Ok((left, right))
}
