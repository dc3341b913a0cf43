//! Structured logging with tracing.
//!
//! Both initializers read the filter from `RUST_LOG` and fall back to the
//! given default when it is unset or invalid.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "warn,acubench={level},acubench_core={level},acubench_kernels={level},acubench_session={level}",
            level = default_level
        )
        .into()
    })
}

/// Initialize JSON logging for machine-readable runs.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    info!("Structured logging initialized");
}

/// Initialize human-readable console logging.
pub fn init_console_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
