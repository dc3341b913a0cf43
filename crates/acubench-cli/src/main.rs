//! Command-line front end for acubench.
//!
//! Provides subcommands:
//! - caps: Feature registers, capability descriptor and selected kernel
//! - math: Timed int8 matrix-multiply throughput benchmark
//! - verify: Cross-check every available kernel path against the reference

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use acubench_core::verify::{compare_rows, reference_product, transpose};
use acubench_core::{AppConfig, BenchError, Deadline, FeatureRegisters, Outcome};
use acubench_kernels::{accelerated, Strategy};
use acubench_session::{logging, Bench, MathReport};

#[derive(Parser)]
#[command(name = "acubench")]
#[command(about = "Capability-aware arithmetic throughput benchmark", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON instead of console text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show CPU feature registers and the kernel path they select
    Caps {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the integer matrix-multiply benchmark
    Math(MathArgs),

    /// Check scalar and accelerated kernels against the reference product
    Verify {
        /// Matrix dimension
        #[arg(short, long, default_value = "257")]
        n: usize,

        /// Number of random matrix pairs
        #[arg(short, long, default_value = "3")]
        rounds: usize,

        /// RNG seed (fresh entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct MathArgs {
    /// TOML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Benchmark duration in milliseconds
    #[arg(short, long)]
    duration_ms: Option<u64>,

    /// Matrix dimension
    #[arg(short, long)]
    n: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run on a worker pool (one worker per core unless --threads is given)
    #[arg(short, long)]
    multithread: bool,

    /// Worker threads for --multithread
    #[arg(short, long)]
    threads: Option<usize>,

    /// Force the scalar kernel
    #[arg(long)]
    scalar: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Caps { json } => {
            init_logging(cli.log_json, "warn");
            show_caps(json)?;
        }

        Commands::Math(args) => {
            let config = load_config(&args)?;
            init_logging(cli.log_json, &config.log_level);
            run_math(&args, &config)?;
        }

        Commands::Verify { n, rounds, seed } => {
            init_logging(cli.log_json, "info");
            verify_paths(n, rounds, seed)?;
        }
    }

    Ok(())
}

fn init_logging(json: bool, level: &str) {
    if json {
        logging::init_logging(level);
    } else {
        logging::init_console_logging(level);
    }
}

fn load_config(args: &MathArgs) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(duration_ms) = args.duration_ms {
        config.math.duration_ms = duration_ms;
    }
    if let Some(n) = args.n {
        config.math.n = n;
    }
    if args.seed.is_some() {
        config.math.seed = args.seed;
    }
    if args.threads.is_some() {
        config.math.threads = args.threads;
    }

    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct CapsReport {
    registers: FeatureRegisters,
    accelerated: bool,
    strategy: Strategy,
    vector_width: Option<usize>,
    num_cores: usize,
}

fn show_caps(json: bool) -> anyhow::Result<()> {
    let registers = FeatureRegisters::read();
    let bench = Bench::with_registers(&registers);
    let report = CapsReport {
        registers,
        accelerated: bench.capabilities().accelerated(),
        strategy: bench.strategy(),
        vector_width: accelerated::vector_width(),
        num_cores: bench.num_cores(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "CPU Capabilities".bold().cyan());
    println!("{}", "─".repeat(50));
    println!("  Register 0:   {:#018x}", report.registers.hwcap);
    println!("  Register 1:   {:#018x}", report.registers.hwcap2);
    println!(
        "  Accelerated:  {}",
        if report.accelerated {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    println!("  Strategy:     {}", report.strategy);
    match report.vector_width {
        Some(width) => println!("  Vector width: {} bytes", width),
        None => println!("  Vector width: -"),
    }
    println!("  Cores:        {}", report.num_cores);
    Ok(())
}

fn run_math(args: &MathArgs, config: &AppConfig) -> anyhow::Result<()> {
    let mut bench = Bench::probe();
    if args.scalar {
        bench = bench.scalar_only();
    }

    if !args.json {
        println!("{}", "Running Math Benchmark".bold().cyan());
        println!("  Strategy: {}", bench.strategy());
        println!("  n: {}", config.math.n);
        println!("  Duration: {}ms", config.math.duration_ms);
        println!();
    }

    let report = if args.multithread {
        match bench.math_multithread(&config.math) {
            Ok(report) => report,
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "multithreaded run failed; retrying on one thread");
                bench.math(&config.math).map_err(explain)?
            }
            Err(err) => return Err(explain(err)),
        }
    } else {
        bench.math(&config.math).map_err(explain)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_math_report(&report);
    }
    Ok(())
}

/// Point kernel faults at the command that isolates them.
fn explain(err: BenchError) -> anyhow::Error {
    if err.is_kernel_fault() {
        anyhow::Error::new(err)
            .context("kernel returned no results; run `acubench verify` to check each path")
    } else {
        err.into()
    }
}

fn print_math_report(report: &MathReport) {
    println!("{}", report.to_string().bold().green());
    println!("  Threads: {}", report.threads);
    println!(
        "  Rounds: {} ({} canceled)",
        report.rounds, report.canceled_rounds
    );
    println!("  Operations: {}", report.ops);
    println!("  Measured time: {:.3}s", report.duration.as_secs_f64());
}

fn verify_paths(n: usize, rounds: usize, seed: Option<u64>) -> anyhow::Result<()> {
    if n == 0 {
        bail!("n must be > 0");
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut paths = vec![Strategy::Scalar];
    if accelerated::is_available() {
        paths.push(Strategy::Accelerated);
    } else {
        println!("{}", "Accelerated path unavailable; checking scalar only".yellow());
    }

    let mut a = vec![0i8; n * n];
    let mut b = vec![0i8; n * n];
    let mut r = vec![0i32; n * n];
    let mut failures = 0;

    for round in 0..rounds {
        rng.fill(&mut a[..]);
        rng.fill(&mut b[..]);
        let b_t = transpose(&b, n);
        let expected = reference_product(&a, &b, n);

        for &strategy in &paths {
            r.fill(0);
            let outcome = strategy.multiply(&a, &b_t, &mut r, n, &Deadline::NONE);
            let check = compare_rows(&expected, &r, n, n);
            let ops_ok = outcome == Outcome::Completed((n * n * n) as u64);

            if check.is_match() && ops_ok {
                println!("{} round {} {:<12} n={}", "✓".green(), round, strategy, n);
            } else {
                failures += 1;
                eprintln!(
                    "{} round {} {:<12} n={}: {} mismatched rows (first {:?}), outcome {:?}",
                    "✗".red(),
                    round,
                    strategy,
                    n,
                    check.mismatched,
                    check.first_mismatch,
                    outcome
                );
            }
        }
    }

    if failures > 0 {
        bail!("{} kernel check(s) failed", failures);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_fault_points_at_verify() {
        let err = explain(BenchError::EmptyResult { round: 2, n: 8 });
        let message = format!("{:#}", err);

        assert!(message.contains("acubench verify"));
        assert!(message.contains("round 2"));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = explain(BenchError::InvalidConfig("n must be > 0".into()));
        assert_eq!("Invalid configuration: n must be > 0", err.to_string());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["acubench", "math", "-n", "33", "--seed", "4", "-t", "2"]);
        let Commands::Math(args) = cli.command else {
            panic!("expected math subcommand");
        };
        let config = load_config(&args).unwrap();

        assert_eq!(33, config.math.n);
        assert_eq!(Some(4), config.math.seed);
        assert_eq!(Some(2), config.math.threads);
        assert_eq!(10_000, config.math.duration_ms);
    }
}
