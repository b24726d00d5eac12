//! TOML configuration for the `merit` binary.
//!
//! Every section is optional; missing keys take the planner's defaults.
//!
//! ```toml
//! [dispatch]
//! max_iterations = 1000
//! tolerance = 1e-6
//! acceptance_tolerance = 0.5
//! floor_policy = "aggregate"
//! output_order = "input"
//!
//! [server]
//! addr = "127.0.0.1:8888"
//!
//! [logging]
//! level = "info"
//! file = "productionplan.log"
//! ```

use anyhow::{anyhow, Context, Result};
use merit_algo::{DispatchPlanner, FloorPolicy, OutputOrder};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MeritConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Planner settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    /// Maximum rebalancing rounds
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Rebalancing convergence threshold (MW)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Residual (MW) above which drift is reported
    #[serde(default = "default_acceptance_tolerance")]
    pub acceptance_tolerance: f64,
    /// "aggregate" or "strict"
    #[serde(default = "default_floor_policy")]
    pub floor_policy: String,
    /// "input" or "merit"
    #[serde(default = "default_output_order")]
    pub output_order: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            acceptance_tolerance: default_acceptance_tolerance(),
            floor_policy: default_floor_policy(),
            output_order: default_output_order(),
        }
    }
}

fn default_max_iterations() -> usize {
    1000
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_acceptance_tolerance() -> f64 {
    0.5
}

fn default_floor_policy() -> String {
    FloorPolicy::default().to_string()
}

fn default_output_order() -> String {
    OutputOrder::default().to_string()
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:8888".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append log lines to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl MeritConfig {
    /// Load from `path`; no path or a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Planner built from the `[dispatch]` section
    pub fn planner(&self) -> Result<DispatchPlanner> {
        let dispatch = &self.dispatch;
        let floor_policy: FloorPolicy = dispatch.floor_policy.parse().map_err(|e| anyhow!("{e}"))?;
        let output_order: OutputOrder = dispatch.output_order.parse().map_err(|e| anyhow!("{e}"))?;
        Ok(DispatchPlanner::new()
            .with_max_iterations(dispatch.max_iterations)
            .with_tolerance(dispatch.tolerance)
            .with_acceptance_tolerance(dispatch.acceptance_tolerance)
            .with_floor_policy(floor_policy)
            .with_output_order(output_order))
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .with_context(|| format!("invalid log level '{}'", self.logging.level))
    }

    pub fn server_addr(&self) -> Result<SocketAddr> {
        self.server
            .addr
            .parse()
            .with_context(|| format!("invalid server address '{}'", self.server.addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = MeritConfig::from_toml_str("").unwrap();
        assert_eq!(config, MeritConfig::default());
        assert_eq!(config.dispatch.max_iterations, 1000);
        assert_eq!(config.dispatch.floor_policy, "aggregate");
        assert_eq!(config.server.addr, "127.0.0.1:8888");
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_partial_sections() {
        let config = MeritConfig::from_toml_str(
            r#"
            [dispatch]
            floor_policy = "strict"

            [logging]
            file = "productionplan.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.dispatch.tolerance, 1e-6);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("productionplan.log")));

        let planner = config.planner().unwrap();
        assert_eq!(planner.floor_policy(), FloorPolicy::Strict);
        assert_eq!(planner.output_order(), OutputOrder::Input);
    }

    #[test]
    fn test_bad_values_are_reported() {
        let config = MeritConfig::from_toml_str("[dispatch]\noutput_order = \"random\"").unwrap();
        assert!(config.planner().is_err());

        let config = MeritConfig::from_toml_str("[server]\naddr = \"nowhere\"").unwrap();
        assert!(config.server_addr().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MeritConfig::load(Some(dir.path().join("merit.toml").as_path())).unwrap();
        assert_eq!(config, MeritConfig::default());
    }
}
