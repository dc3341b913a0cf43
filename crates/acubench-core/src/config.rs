//! Centralized configuration management with TOML support.
//!
//! Provides structured configs for the benchmark rounds with load/save
//! capabilities. Every field has a default, so a config file only needs the
//! values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{BenchError, Result};

/// Integer matrix-multiply benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// Wall-clock budget for the whole benchmark, in milliseconds.
    pub duration_ms: u64,
    /// Matrix dimension (n×n operands).
    pub n: usize,
    /// RNG seed for operand data; fresh entropy when absent.
    pub seed: Option<u64>,
    /// Worker threads for the multithreaded variant; all cores when absent.
    pub threads: Option<usize>,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            duration_ms: 10_000,
            n: 1024,
            seed: None,
            threads: None,
        }
    }
}

impl MathConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(BenchError::InvalidConfig("n must be > 0".into()));
        }
        if self.n.checked_mul(self.n).is_none() {
            return Err(BenchError::InvalidConfig(format!(
                "n*n overflows usize: n={}",
                self.n
            )));
        }
        if self.duration_ms == 0 {
            return Err(BenchError::InvalidConfig(
                "duration_ms must be > 0".into(),
            ));
        }
        if self.threads == Some(0) {
            return Err(BenchError::InvalidConfig("threads must be > 0".into()));
        }
        Ok(())
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Matrix-multiply benchmark config.
    pub math: MathConfig,
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            math: MathConfig::default(),
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BenchError::Other(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Validate all sub-configs.
    pub fn validate(&self) -> Result<()> {
        self.math.validate()?;
        if !matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(BenchError::InvalidConfig(format!(
                "unknown log_level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        MathConfig::default().validate().unwrap();
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_n = MathConfig {
            n: 0,
            ..Default::default()
        };
        assert!(zero_n.validate().is_err());

        let zero_duration = MathConfig {
            duration_ms: 0,
            ..Default::default()
        };
        assert!(zero_duration.validate().is_err());

        let zero_threads = MathConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert!(zero_threads.validate().is_err());

        let huge_n = MathConfig {
            n: usize::MAX,
            ..Default::default()
        };
        assert!(huge_n.validate().is_err());

        let bad_level = AppConfig {
            log_level: "loud".into(),
            ..Default::default()
        };
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let cfg = AppConfig {
            math: MathConfig {
                duration_ms: 2_500,
                n: 96,
                seed: Some(7),
                threads: Some(3),
            },
            log_level: "debug".into(),
        };
        let tmp = tempfile::NamedTempFile::new().unwrap();
        cfg.save(tmp.path()).unwrap();
        let loaded = AppConfig::from_file(tmp.path()).unwrap();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let cfg: AppConfig = toml::from_str("[math]\nn = 33\n").unwrap();
        assert_eq!(33, cfg.math.n);
        assert_eq!(MathConfig::default().duration_ms, cfg.math.duration_ms);
        assert_eq!("info", cfg.log_level);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AppConfig::from_file("/nonexistent/acubench.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/acubench.toml"));
    }
}
