//! Fixtures for the unit tests of this crate.

use std::cell::Cell;

use acubench_core::Expirable;

/// Expires after a fixed number of polls.
pub(crate) struct Countdown(Cell<usize>);

impl Countdown {
    pub(crate) fn new(checks: usize) -> Self {
        Self(Cell::new(checks))
    }
}

impl Expirable for Countdown {
    fn reached(&self) -> bool {
        match self.0.get() {
            0 => true,
            left => {
                self.0.set(left - 1);
                false
            }
        }
    }
}

/// Deterministic pseudo-random n×n int8 matrix.
pub(crate) fn gen_matrix(n: usize, salt: u32) -> Vec<i8> {
    (0..n * n)
        .map(|i| ((i as u32).wrapping_mul(2654435761).wrapping_add(salt) >> 24) as i8)
        .collect()
}
