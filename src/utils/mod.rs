#[cfg(test)]
use std::fmt::Debug;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::solution::Route;

pub mod logging;
pub mod stats;
pub mod validator;

pub type Random = Pcg64Mcg;

pub fn create_seeded_rng(seed: i128) -> Random {
    let mut rng = Pcg64Mcg::from_seed(seed.to_le_bytes());
    // discard the first three
    rng.next_u64();
    rng.next_u64();
    rng.next_u64();
    rng
}

/// Receives progress events of the route decomposition; owned by the caller.
pub trait DecompositionTracker {
    fn route_found(&mut self, route: &Route, remaining_candidates: usize);
}

pub struct DisabledTracker {}

impl DisabledTracker {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for DisabledTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompositionTracker for DisabledTracker {
    fn route_found(&mut self, _: &Route, _: usize) {}
}

#[cfg(test)]
pub fn assert_vec_eq<T: PartialEq + Eq + Debug>(expect: &Vec<T>, actual: &Vec<T>) {
    assert_eq!(
        expect.len(),
        actual.len(),
        "sizes of the vecs differ (expect: {}, actual: {})",
        expect.len(),
        actual.len()
    );
    for (idx, (x, y)) in expect.iter().zip(actual.iter()).enumerate() {
        assert_eq!(
            x, y,
            "vecs differ at index {} ({:?} != {:?})\n expect: {:?}\n actual: {:?}",
            idx, x, y, &expect, &actual
        );
    }
}
