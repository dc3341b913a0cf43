//! Fuzz target for the matrix kernels.
//!
//! Tests for:
//! - Memory safety on arbitrary sizes (tail chunks of every length)
//! - Scalar path equals the reference product
//! - Accelerated path bit-identical to scalar, same operation count

#![no_main]

use acubench_core::verify::{reference_product, transpose};
use acubench_core::{Deadline, Outcome};
use acubench_kernels::{accelerated, scalar};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&size, rest)) = data.split_first() else {
        return;
    };

    // Keep n small enough for the reference product to stay fast.
    let n = usize::from(size % 72);
    let len = n * n;
    if rest.len() < 2 * len {
        return;
    }

    let a: Vec<i8> = rest[..len].iter().map(|&v| v as i8).collect();
    let b: Vec<i8> = rest[len..2 * len].iter().map(|&v| v as i8).collect();
    let b_t = transpose(&b, n);

    let mut slow = vec![0i32; len];
    let slow_ops = scalar::multiply(&a, &b_t, &mut slow, n, &Deadline::NONE);
    assert_eq!(Outcome::Completed((len * n) as u64), slow_ops);
    assert_eq!(reference_product(&a, &b, n), slow, "scalar diverged at n={}", n);

    if accelerated::is_available() {
        let mut fast = vec![0i32; len];
        let fast_ops = accelerated::multiply(&a, &b_t, &mut fast, n, &Deadline::NONE);
        assert_eq!(slow_ops, fast_ops, "operation count diverged at n={}", n);
        assert_eq!(slow, fast, "accelerated diverged at n={}", n);
    }
});
