//! SVE-gated lanes for aarch64.
//!
//! The chunk width follows the SVE vector length of the running core
//! (128 to 2048 bits), so the cancellation granularity matches what an SVE
//! int8 matrix kernel would see. The arithmetic itself runs in 16-byte NEON
//! blocks: `SMULL`/`SMULL2` widen i8 products to i16 (at most 128², no
//! overflow) and `SADALP` pair-adds them into four i32 accumulators.

use std::arch::aarch64::*;

use acubench_core::{Expirable, Outcome};

use crate::lanes::{self, DotLanes};

const BLOCK: usize = 16;

pub(super) fn vector_width() -> Option<usize> {
    if std::arch::is_aarch64_feature_detected!("sve")
        && std::arch::is_aarch64_feature_detected!("i8mm")
    {
        // SAFETY: SVE presence was just confirmed.
        Some(unsafe { sve_vector_bytes() })
    } else {
        None
    }
}

/// SVE vector length in bytes (`RDVL X0, #1`).
///
/// # Safety
/// The CPU must implement SVE; the instruction is undefined otherwise.
unsafe fn sve_vector_bytes() -> usize {
    let bytes: u64;
    // Raw encoding so the crate builds without the `sve` target feature.
    std::arch::asm!(
        ".inst 0x04bf5020",
        out("x0") bytes,
        options(pure, nomem, nostack, preserves_flags)
    );
    bytes as usize
}

struct NeonLanes {
    width: usize,
}

impl NeonLanes {
    #[inline(always)]
    unsafe fn block(acc: int32x4_t, a: int8x16_t, b: int8x16_t) -> int32x4_t {
        let lo = vmull_s8(vget_low_s8(a), vget_low_s8(b));
        let hi = vmull_high_s8(a, b);
        vpadalq_s16(vpadalq_s16(acc, lo), hi)
    }
}

impl DotLanes for NeonLanes {
    const CHECK_EACH_CHUNK: bool = true;

    type Acc = int32x4_t;

    fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    unsafe fn zero(&self) -> int32x4_t {
        vdupq_n_s32(0)
    }

    #[inline(always)]
    unsafe fn step(&self, mut acc: int32x4_t, a: &[i8], b: &[i8]) -> int32x4_t {
        let mut a_blocks = a.chunks_exact(BLOCK);
        let mut b_blocks = b.chunks_exact(BLOCK);

        for (a_block, b_block) in (&mut a_blocks).zip(&mut b_blocks) {
            acc = Self::block(acc, vld1q_s8(a_block.as_ptr()), vld1q_s8(b_block.as_ptr()));
        }

        let (a_rest, b_rest) = (a_blocks.remainder(), b_blocks.remainder());
        if !a_rest.is_empty() {
            let mut tail_a = [0i8; BLOCK];
            let mut tail_b = [0i8; BLOCK];
            tail_a[..a_rest.len()].copy_from_slice(a_rest);
            tail_b[..b_rest.len()].copy_from_slice(b_rest);
            acc = Self::block(acc, vld1q_s8(tail_a.as_ptr()), vld1q_s8(tail_b.as_ptr()));
        }

        acc
    }

    #[inline(always)]
    unsafe fn reduce(&self, acc: int32x4_t) -> i32 {
        vaddvq_s32(acc)
    }
}

/// # Safety
/// `width` must come from [`vector_width`] and the operands must have passed
/// [`lanes::check_operands`].
pub(super) unsafe fn multiply<E>(
    width: usize,
    a: &[i8],
    b_t: &[i8],
    out: &mut [i32],
    n: usize,
    deadline: &E,
) -> Outcome
where
    E: Expirable + ?Sized,
{
    lanes::run(&NeonLanes { width }, a, b_t, out, n, deadline)
}
