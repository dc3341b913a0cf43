//! The loop skeleton shared by every kernel path.
//!
//! ```text
//! for i in rows:                      <- deadline check
//!     for j in columns:
//!         acc = zero
//!         for chunk in k.chunks(width):   <- deadline check (vector paths)
//!             acc = step(acc, a[i][chunk], bᵗ[j][chunk])
//!             ops += chunk.len()
//!         r[i][j] = reduce(acc)
//! ```
//!
//! Only `step` and `reduce` differ between paths. Operation units are
//! scalar-equivalent: a chunk counts one unit per element it covers, so a
//! finished n×n multiply reports n³ on every path.

use acubench_core::{Expirable, Outcome};

/// Per-path arithmetic plugged into [`run`].
pub(crate) trait DotLanes {
    /// Poll the deadline before every chunk, not just every row.
    const CHECK_EACH_CHUNK: bool;

    type Acc: Copy;

    /// Contraction elements consumed per step. The last step of a row may be
    /// shorter.
    fn width(&self) -> usize;

    /// # Safety
    /// The CPU must implement the instructions this lane set uses.
    unsafe fn zero(&self) -> Self::Acc;

    /// Accumulate `a · b` into `acc`. `a.len() == b.len() <= width()`; a
    /// shorter slice is the partial tail chunk.
    ///
    /// # Safety
    /// Same as [`DotLanes::zero`].
    unsafe fn step(&self, acc: Self::Acc, a: &[i8], b: &[i8]) -> Self::Acc;

    /// # Safety
    /// Same as [`DotLanes::zero`].
    unsafe fn reduce(&self, acc: Self::Acc) -> i32;
}

/// Panics unless every operand holds exactly n² elements.
pub(crate) fn check_operands(a: &[i8], b_t: &[i8], out: &[i32], n: usize) {
    let len = n.checked_mul(n).expect("n*n overflows usize");
    assert_eq!(a.len(), len, "A dimensions mismatch: expected {}, got {}", len, a.len());
    assert_eq!(
        b_t.len(),
        len,
        "Bᵗ dimensions mismatch: expected {}, got {}",
        len,
        b_t.len()
    );
    assert_eq!(
        out.len(),
        len,
        "R dimensions mismatch: expected {}, got {}",
        len,
        out.len()
    );
}

/// Run the full multiply with `lanes` doing the arithmetic.
///
/// # Safety
/// The CPU must implement the instructions `lanes` uses. Operand lengths must
/// have been checked with [`check_operands`].
#[inline(always)]
pub(crate) unsafe fn run<L, E>(
    lanes: &L,
    a: &[i8],
    b_t: &[i8],
    out: &mut [i32],
    n: usize,
    deadline: &E,
) -> Outcome
where
    L: DotLanes,
    E: Expirable + ?Sized,
{
    if n == 0 {
        return Outcome::Completed(0);
    }

    let width = lanes.width();
    let mut ops = 0u64;

    for (a_row, out_row) in a.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
        if deadline.reached() {
            return Outcome::Canceled(ops);
        }

        for (cell, b_row) in out_row.iter_mut().zip(b_t.chunks_exact(n)) {
            let mut acc = lanes.zero();

            for (a_chunk, b_chunk) in a_row.chunks(width).zip(b_row.chunks(width)) {
                if L::CHECK_EACH_CHUNK && deadline.reached() {
                    return Outcome::Canceled(ops);
                }

                acc = lanes.step(acc, a_chunk, b_chunk);
                ops += a_chunk.len() as u64;
            }

            *cell = lanes.reduce(acc);
        }
    }

    Outcome::Completed(ops)
}
