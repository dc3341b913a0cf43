//! Benchmark sessions over the acubench kernels.
//!
//! A [`Bench`] probes (or is handed) the CPU capabilities once, selects a
//! kernel strategy once, and then runs timed benchmarks that turn operation
//! counts into a throughput figure.

pub mod bench;
pub mod logging;
pub mod math;

pub use bench::Bench;
pub use math::MathReport;
