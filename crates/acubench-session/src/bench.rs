//! Benchmark session: capabilities and strategy, fixed for its lifetime.

use serde::Serialize;
use tracing::debug;

use acubench_core::{Capabilities, FeatureRegisters, MathConfig, Result};
use acubench_kernels::Strategy;

use crate::math::{self, MathReport};

/// A benchmark session.
///
/// Capabilities are established once and the kernel strategy is selected
/// once; every benchmark run from this session reuses both.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Bench {
    capabilities: Capabilities,
    strategy: Strategy,
    num_cores: usize,
}

impl Bench {
    /// Session for the running hardware.
    pub fn probe() -> Self {
        Self::with_capabilities(acubench_core::probe())
    }

    /// Session for host-supplied feature registers.
    pub fn with_registers(registers: &FeatureRegisters) -> Self {
        Self::with_capabilities(Capabilities::from_target_registers(registers))
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        let strategy = Strategy::select(&capabilities);
        let num_cores = num_cpus::get();

        debug!(
            accelerated = capabilities.accelerated(),
            %strategy,
            num_cores,
            "benchmark session ready"
        );

        Self {
            capabilities,
            strategy,
            num_cores,
        }
    }

    /// Pin the session to the scalar path regardless of capabilities.
    pub fn scalar_only(mut self) -> Self {
        self.strategy = Strategy::Scalar;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn num_cores(&self) -> usize {
        self.num_cores
    }

    pub fn math(&self, config: &MathConfig) -> Result<MathReport> {
        math::bench(self.strategy, config)
    }

    /// Multithreaded math benchmark on `config.threads` workers, or one per
    /// core when unset.
    pub fn math_multithread(&self, config: &MathConfig) -> Result<MathReport> {
        let threads = config.threads.unwrap_or(self.num_cores);
        math::bench_multithread(self.strategy, config, threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_session_is_scalar() {
        let bench = Bench::with_capabilities(Capabilities::unsupported());
        assert_eq!(Strategy::Scalar, bench.strategy());
        assert!(bench.num_cores() >= 1);
    }

    #[test]
    fn test_empty_registers_are_scalar() {
        let bench = Bench::with_registers(&FeatureRegisters::default());
        assert!(!bench.capabilities().accelerated());
        assert_eq!(Strategy::Scalar, bench.strategy());
    }

    #[test]
    fn test_scalar_only_overrides_strategy() {
        let bench = Bench::probe().scalar_only();
        assert_eq!(Strategy::Scalar, bench.strategy());
    }

    #[test]
    fn test_session_runs_math() {
        let config = MathConfig {
            duration_ms: 150,
            n: 16,
            seed: Some(5),
            threads: Some(2),
        };
        let bench = Bench::probe();

        let single = bench.math(&config).unwrap();
        assert_eq!(bench.strategy(), single.strategy);
        assert!(single.ops > 0);

        let multi = bench.math_multithread(&config).unwrap();
        assert_eq!(2, multi.threads);
        assert!(multi.ops > 0);
    }
}
