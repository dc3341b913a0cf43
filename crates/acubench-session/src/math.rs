//! Integer matrix-multiply throughput benchmark.
//!
//! Each round refills both operands with fresh random bytes, clears the
//! result and runs the session's kernel strategy against the remaining time
//! budget. Rounds repeat until the budget is spent. The kernel is canceled
//! mid-round when time runs out; the work it did still counts.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, trace};

use acubench_core::verify::{reference_product, transpose};
use acubench_core::{BenchError, Expirable, MathConfig, Outcome, Result, Timeout};
use acubench_kernels::Strategy;

/// Throughput figures of one math benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct MathReport {
    pub strategy: Strategy,
    pub n: usize,
    pub threads: usize,
    pub rounds: u64,
    pub canceled_rounds: u64,
    /// Scalar-equivalent multiply-add operations, partial rounds included.
    pub ops: u64,
    pub duration: Duration,
    /// Operations per second.
    pub tps: f64,
}

impl fmt::Display for MathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "math ... {} ops/s", self.tps.floor())
    }
}

#[derive(Debug, Default)]
struct ReportBuilder {
    duration: Duration,
    ops: u64,
    rounds: u64,
    canceled_rounds: u64,
}

impl ReportBuilder {
    fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, duration: Duration, outcome: Outcome) {
        self.duration += duration;
        self.ops += outcome.ops();
        self.rounds += 1;
        if outcome.is_canceled() {
            self.canceled_rounds += 1;
        }
    }

    fn merge(&mut self, other: ReportBuilder) {
        self.duration += other.duration;
        self.ops += other.ops;
        self.rounds += other.rounds;
        self.canceled_rounds += other.canceled_rounds;
    }

    fn build(self, strategy: Strategy, n: usize, threads: usize) -> MathReport {
        let tps = match self.duration {
            Duration::ZERO => 0.,
            duration => self.ops as f64 / duration.as_secs_f64(),
        };

        MathReport {
            strategy,
            n,
            threads,
            rounds: self.rounds,
            canceled_rounds: self.canceled_rounds,
            ops: self.ops,
            duration: self.duration,
            tps,
        }
    }
}

/// Operand and result buffers of one worker, plus its random stream.
struct Context {
    rng: StdRng,
    n: usize,
    matrix_a: Vec<i8>,
    matrix_b_t: Vec<i8>,
    matrix_r: Vec<i32>,
}

impl Context {
    fn new(n: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            n,
            matrix_a: vec![0; n * n],
            matrix_b_t: vec![0; n * n],
            matrix_r: vec![0; n * n],
        }
    }

    fn reset(&mut self) {
        self.rng.fill(&mut self.matrix_a[..]);
        self.rng.fill(&mut self.matrix_b_t[..]);
        self.matrix_r.fill(0);
    }

    /// An all-zero result is only legitimate when the true product is zero.
    fn check_result(&self, round: u64) -> Result<()> {
        if self.matrix_r.iter().any(|&v| v != 0) {
            return Ok(());
        }

        let matrix_b = transpose(&self.matrix_b_t, self.n);
        if reference_product(&self.matrix_a, &matrix_b, self.n)
            .iter()
            .all(|&v| v == 0)
        {
            return Ok(());
        }

        Err(BenchError::EmptyResult { round, n: self.n })
    }
}

fn run_rounds(
    strategy: Strategy,
    context: &mut Context,
    timeout: &Timeout,
    report: &mut ReportBuilder,
) -> Result<()> {
    while !timeout.reached() {
        context.reset();

        let deadline = timeout.deadline();
        let start = Instant::now();
        let outcome = black_box(strategy.multiply(
            &context.matrix_a,
            &context.matrix_b_t,
            &mut context.matrix_r,
            context.n,
            &deadline,
        ));
        report.add(start.elapsed(), outcome);

        trace!(
            round = report.rounds,
            ops = outcome.ops(),
            canceled = outcome.is_canceled(),
            "math round"
        );

        // The kernel only stops early once the budget is spent.
        if outcome.is_canceled() {
            break;
        }
        context.check_result(report.rounds)?;
    }

    Ok(())
}

/// Single-threaded benchmark. Throughput is measured over kernel time only.
pub fn bench(strategy: Strategy, config: &MathConfig) -> Result<MathReport> {
    config.validate()?;

    let mut context = Context::new(config.n, config.seed);
    let mut report = ReportBuilder::new();
    let timeout = Timeout::new(config.duration());

    debug!(%strategy, n = config.n, duration_ms = config.duration_ms, "starting math benchmark");
    run_rounds(strategy, &mut context, &timeout, &mut report)?;

    let report = report.build(strategy, config.n, 1);
    info!(
        %strategy,
        n = report.n,
        rounds = report.rounds,
        ops = report.ops,
        tps = report.tps,
        "math benchmark finished"
    );
    Ok(report)
}

/// Benchmark on `threads` workers, each with its own buffers and random
/// stream. Throughput is total operations over wall-clock time.
///
/// With a fixed seed, worker `i` uses `seed + i`.
pub fn bench_multithread(
    strategy: Strategy,
    config: &MathConfig,
    threads: usize,
) -> Result<MathReport> {
    config.validate()?;
    if threads == 0 {
        return Err(BenchError::InvalidConfig("threads must be > 0".into()));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("acubench-math-{}", i))
        .build()
        .map_err(|e| BenchError::ThreadPool(e.to_string()))?;

    debug!(%strategy, n = config.n, threads, duration_ms = config.duration_ms, "starting multithreaded math benchmark");

    let timeout = Timeout::new(config.duration());
    let start = Instant::now();
    let partials = pool.broadcast(|ctx| {
        let seed = config.seed.map(|seed| seed.wrapping_add(ctx.index() as u64));
        let mut context = Context::new(config.n, seed);
        let mut report = ReportBuilder::new();
        run_rounds(strategy, &mut context, &timeout, &mut report).map(|()| report)
    });
    let wall = start.elapsed();

    let mut total = ReportBuilder::new();
    for partial in partials {
        total.merge(partial?);
    }
    total.duration = wall;

    let report = total.build(strategy, config.n, threads);
    info!(
        %strategy,
        n = report.n,
        threads,
        rounds = report.rounds,
        ops = report.ops,
        tps = report.tps,
        "multithreaded math benchmark finished"
    );
    Ok(report)
}
