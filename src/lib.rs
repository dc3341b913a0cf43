//! acubench: capability-aware arithmetic throughput benchmark.
//!
//! Facade over the workspace crates:
//! - `acubench-core`: capability probe, deadlines, outcomes, config, errors
//! - `acubench-kernels`: scalar and accelerated int8 matrix multiply
//! - `acubench-session`: timed benchmark sessions and reports

pub use acubench_core::{
    probe, verify, AppConfig, BenchError, Capabilities, Deadline, Expirable, FeatureMask,
    FeatureRegisters, MathConfig, Outcome, Register, Timeout,
};
pub use acubench_kernels::{accelerated, dispatch, multiply, scalar, Strategy};
pub use acubench_session::{logging, math, Bench, MathReport};
