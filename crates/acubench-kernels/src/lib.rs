//! Integer matrix-multiply kernels for the arithmetic throughput benchmark.
//!
//! `R = A · B` for n×n `i8` operands into `i32` results, with B supplied
//! pre-transposed. Two strategies compute bit-identical results:
//!
//! - [`scalar`]: portable, one multiply-add at a time.
//! - [`accelerated`]: wide int8 dot-product vectors, gated on
//!   [`Capabilities`](acubench_core::Capabilities).
//!
//! [`dispatch`] picks one per session. Both run the same loop skeleton
//! (`lanes`), which owns iteration order, cancellation and operation
//! accounting.

pub mod accelerated;
pub mod dispatch;
mod lanes;
pub mod scalar;
#[cfg(test)]
mod testing;

pub use dispatch::{multiply, Strategy};
