//! Wide int8 dot-product path.
//!
//! ```text
//! Target   Gate            Chunk width              Arithmetic
//! ───────  ──────────────  ───────────────────────  ─────────────────────────────
//! x86_64   AVX2            32 bytes                 i8→i16 sign-extend, VPMADDWD
//! aarch64  SVE + I8MM      SVE vector length (RDVL) 16-byte SMULL/SMULL2 + SADALP
//! other    -               -                        returns Completed(0)
//! ```
//!
//! The deadline is polled before every row and before every chunk, the
//! partial tail chunk included. The tail is loaded through a zero-filled stack
//! buffer, so no n is rejected and nothing is allocated.
//!
//! Selection normally goes through [`Strategy`](crate::Strategy), which
//! consults [`Capabilities`](acubench_core::Capabilities) first. The runtime
//! check here only keeps [`multiply`] sound when called directly.

use acubench_core::{Expirable, Outcome};

use crate::lanes;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2 as imp;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon as imp;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
mod imp {
    use acubench_core::{Expirable, Outcome};

    pub(super) fn vector_width() -> Option<usize> {
        None
    }

    pub(super) unsafe fn multiply<E: Expirable + ?Sized>(
        _width: usize,
        _a: &[i8],
        _b_t: &[i8],
        _out: &mut [i32],
        _n: usize,
        _deadline: &E,
    ) -> Outcome {
        Outcome::Completed(0)
    }
}

/// Bytes of the contraction dimension consumed per chunk, or `None` when
/// the running CPU lacks the instruction family.
pub fn vector_width() -> Option<usize> {
    imp::vector_width()
}

/// Can the accelerated path run on this CPU?
pub fn is_available() -> bool {
    vector_width().is_some()
}

/// Accelerated `out = a · b_tᵗ`, bit-identical to
/// [`scalar::multiply`](crate::scalar::multiply).
///
/// Returns `Completed(0)` without touching `out` when the instruction family
/// is missing. Operation counts are scalar-equivalent: a completed run
/// reports n³.
///
/// # Panics
/// Panics if any operand does not hold exactly n² elements.
pub fn multiply<E>(a: &[i8], b_t: &[i8], out: &mut [i32], n: usize, deadline: &E) -> Outcome
where
    E: Expirable + ?Sized,
{
    lanes::check_operands(a, b_t, out, n);

    match vector_width() {
        // SAFETY: vector_width() only reports a width after runtime detection
        // confirmed the instructions imp uses.
        Some(width) => unsafe { imp::multiply(width, a, b_t, out, n, deadline) },
        None => Outcome::Completed(0),
    }
}
