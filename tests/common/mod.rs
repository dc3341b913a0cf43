//! Shared fixtures for the workspace integration tests.

#![allow(dead_code)]

use std::cell::Cell;

use acubench::Expirable;

/// Generate a deterministic pseudo-random n×n int8 matrix.
pub fn gen_matrix(n: usize, salt: u32) -> Vec<i8> {
    (0..n * n)
        .map(|i| ((i as u32 ^ salt).wrapping_mul(2654435761) >> 24) as i8)
        .collect()
}

/// A deadline that passes after a fixed number of checks.
///
/// Gives reproducible cancellation points independent of machine speed.
pub struct Countdown {
    left: Cell<usize>,
    polls: Cell<usize>,
}

impl Countdown {
    pub fn new(checks: usize) -> Self {
        Self {
            left: Cell::new(checks),
            polls: Cell::new(0),
        }
    }

    /// Total times the kernel polled this deadline.
    pub fn polls(&self) -> usize {
        self.polls.get()
    }
}

impl Expirable for Countdown {
    fn reached(&self) -> bool {
        self.polls.set(self.polls.get() + 1);
        match self.left.get() {
            0 => true,
            left => {
                self.left.set(left - 1);
                false
            }
        }
    }
}
