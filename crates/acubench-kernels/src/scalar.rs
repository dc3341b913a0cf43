//! Portable scalar path.
//!
//! The reference every other path must match bit for bit. The deadline is
//! polled once per output row.

use acubench_core::{Expirable, Outcome};

use crate::lanes::{self, DotLanes};

struct ScalarLanes;

impl DotLanes for ScalarLanes {
    const CHECK_EACH_CHUNK: bool = false;

    type Acc = i32;

    // A whole row is one step; the count still advances one unit per
    // multiply-add.
    fn width(&self) -> usize {
        usize::MAX
    }

    #[inline(always)]
    unsafe fn zero(&self) -> i32 {
        0
    }

    #[inline(always)]
    unsafe fn step(&self, acc: i32, a: &[i8], b: &[i8]) -> i32 {
        a.iter()
            .zip(b)
            .fold(acc, |acc, (&x, &y)| acc.wrapping_add(i32::from(x) * i32::from(y)))
    }

    #[inline(always)]
    unsafe fn reduce(&self, acc: i32) -> i32 {
        acc
    }
}

/// Scalar `out = a · b_tᵗ`.
///
/// `b_t` is B transposed (row j of `b_t` is column j of B). Returns
/// `Completed(n³)`, or `Canceled(ops)` when `deadline` passes before a row.
///
/// # Panics
/// Panics if any operand does not hold exactly n² elements.
pub fn multiply<E>(a: &[i8], b_t: &[i8], out: &mut [i32], n: usize, deadline: &E) -> Outcome
where
    E: Expirable + ?Sized,
{
    lanes::check_operands(a, b_t, out, n);

    // SAFETY: scalar lanes use no optional instructions; operands checked above.
    unsafe { lanes::run(&ScalarLanes, a, b_t, out, n, deadline) }
}

#[cfg(test)]
mod tests {
    use acubench_core::verify::{reference_product, transpose};
    use acubench_core::Deadline;

    use super::*;
    use crate::testing::{gen_matrix, Countdown};

    #[test]
    fn test_matrix() {
        let matrix_a = [80, 43, 16, 5, 70, 41, 38, 62, 31, 19, 97, 39, 66, 6, 40, 28];
        // Bᵗ, i.e. the columns of B = [[24, 12, 24, 29], [83, 59, 32, 44], ...]
        let matrix_b_t = [24, 83, 97, 98, 12, 59, 38, 64, 24, 32, 67, 68, 29, 44, 13, 29];

        let matrix_r_expected = [
            7531, 4425, 4708, 4565, 14845, 8671, 9754, 6126, 15552, 7675, 10503, 4127, 8706, 4458,
            6360, 3510,
        ];

        let mut matrix_r = [0i32; 16];
        let result = multiply(&matrix_a, &matrix_b_t, &mut matrix_r, 4, &Deadline::NONE);

        assert_eq!(Outcome::Completed(64), result);
        assert_eq!(matrix_r_expected, matrix_r);
    }

    #[test]
    fn test_matches_reference() {
        for n in [1, 2, 3, 7, 16, 33] {
            let a = gen_matrix(n, 1);
            let b = gen_matrix(n, 2);
            let mut r = vec![0i32; n * n];

            let result = multiply(&a, &transpose(&b, n), &mut r, n, &Deadline::NONE);

            assert_eq!(Outcome::Completed((n * n * n) as u64), result);
            assert_eq!(reference_product(&a, &b, n), r, "n={}", n);
        }
    }

    #[test]
    fn test_zero_n() {
        let result = multiply(&[], &[], &mut [], 0, &Deadline::NONE);
        assert_eq!(Outcome::Completed(0), result);
    }

    #[test]
    fn test_cancel_at_row_boundary() {
        let n = 5;
        let a = gen_matrix(n, 3);
        let b = gen_matrix(n, 4);
        let expected = reference_product(&a, &b, n);

        for rows in 0..n {
            let mut r = vec![i32::MIN; n * n];
            let result = multiply(&a, &transpose(&b, n), &mut r, n, &Countdown::new(rows));

            assert_eq!(Outcome::Canceled((rows * n * n) as u64), result);
            assert_eq!(expected[..rows * n], r[..rows * n]);
            assert!(r[rows * n..].iter().all(|&v| v == i32::MIN));
        }
    }

    #[test]
    fn test_past_deadline_touches_nothing() {
        let n = 8;
        let a = gen_matrix(n, 5);
        let b_t = gen_matrix(n, 6);
        let mut r = vec![-1i32; n * n];

        let result = multiply(&a, &b_t, &mut r, n, &Deadline::at_millis(1));

        assert_eq!(Outcome::Canceled(0), result);
        assert!(r.iter().all(|&v| v == -1));
    }

    #[test]
    #[should_panic(expected = "Bᵗ dimensions mismatch")]
    fn test_short_operand_panics() {
        let mut r = [0i32; 4];
        multiply(&[0; 4], &[0; 3], &mut r, 2, &Deadline::NONE);
    }
}
