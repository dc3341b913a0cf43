//! Core types shared across the acubench crates.
//!
//! Provides:
//! - Hardware capability probe (feature registers, masks, descriptor)
//! - Deadlines and the completed/canceled kernel outcome
//! - Centralized error types via thiserror
//! - Configuration management with TOML support
//! - Reference product and row comparison for cross-validating kernels

pub mod config;
pub mod deadline;
pub mod error;
pub mod features;
pub mod outcome;
pub mod verify;

// Re-export commonly used types
pub use config::{AppConfig, MathConfig};
pub use deadline::{Deadline, Expirable, Timeout};
pub use error::{BenchError, Result};
pub use features::{probe, Capabilities, FeatureMask, FeatureRegisters, Register};
pub use outcome::Outcome;
