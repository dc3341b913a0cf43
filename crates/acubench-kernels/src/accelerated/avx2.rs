//! AVX2 lanes: 32 int8 values per chunk.
//!
//! Each half of the chunk is sign-extended to sixteen i16 lanes and
//! contracted with `_mm256_madd_epi16`, which multiplies adjacent pairs and
//! sums them into i32 lanes. A pair sum is at most 2·128² = 32768, so the
//! only wrap-around happens in the i32 accumulators, exactly as in the
//! scalar path.

use std::arch::x86_64::*;

use acubench_core::{Expirable, Outcome};

use crate::lanes::{self, DotLanes};

const WIDTH: usize = 32;

pub(super) fn vector_width() -> Option<usize> {
    std::arch::is_x86_feature_detected!("avx2").then_some(WIDTH)
}

struct Avx2Lanes;

impl DotLanes for Avx2Lanes {
    const CHECK_EACH_CHUNK: bool = true;

    type Acc = __m256i;

    fn width(&self) -> usize {
        WIDTH
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn zero(&self) -> __m256i {
        _mm256_setzero_si256()
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn step(&self, acc: __m256i, a: &[i8], b: &[i8]) -> __m256i {
        let (va, vb) = if a.len() == WIDTH {
            (load(a.as_ptr()), load(b.as_ptr()))
        } else {
            let mut tail_a = [0i8; WIDTH];
            let mut tail_b = [0i8; WIDTH];
            tail_a[..a.len()].copy_from_slice(a);
            tail_b[..b.len()].copy_from_slice(b);
            (load(tail_a.as_ptr()), load(tail_b.as_ptr()))
        };

        let a_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(va));
        let a_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256::<1>(va));
        let b_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(vb));
        let b_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256::<1>(vb));

        let sum = _mm256_add_epi32(_mm256_madd_epi16(a_lo, b_lo), _mm256_madd_epi16(a_hi, b_hi));
        _mm256_add_epi32(acc, sum)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn reduce(&self, acc: __m256i) -> i32 {
        let sum = _mm_add_epi32(
            _mm256_castsi256_si128(acc),
            _mm256_extracti128_si256::<1>(acc),
        );
        let sum = _mm_add_epi32(sum, _mm_shuffle_epi32::<0b01_00_11_10>(sum));
        let sum = _mm_add_epi32(sum, _mm_shuffle_epi32::<0b10_11_00_01>(sum));
        _mm_cvtsi128_si32(sum)
    }
}

/// # Safety
/// `ptr` must be valid for 32 bytes of reads.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load(ptr: *const i8) -> __m256i {
    _mm256_loadu_si256(ptr as *const __m256i)
}

/// # Safety
/// The CPU must support AVX2 and the operands must have passed
/// [`lanes::check_operands`].
#[target_feature(enable = "avx2")]
pub(super) unsafe fn multiply<E>(
    _width: usize,
    a: &[i8],
    b_t: &[i8],
    out: &mut [i32],
    n: usize,
    deadline: &E,
) -> Outcome
where
    E: Expirable + ?Sized,
{
    lanes::run(&Avx2Lanes, a, b_t, out, n, deadline)
}
