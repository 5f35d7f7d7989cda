//! Configuration system
//!
//! Provides layered configuration management with:
//! - Runtime defaults
//! - Config file loading (optional, TOML)
//! - Environment variable overrides
//! - Validation before anything runs
//!
//! Command-line flags are applied last by the binary. The resulting [`Config`]
//! is passed down explicitly; there is no process-wide instance.

use crate::models::IdentityStrategy;
use crate::pipeline::PipelineOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Pipeline configuration
    pub processing: ProcessingConfig,

    /// Deduplication configuration
    pub dedup: DedupConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Paths configuration
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub application_id: String,
    pub worker_count: usize,
    pub partition_count: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub identity: IdentityStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub log_directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let pipeline = PipelineOptions::default();
        Self {
            application_id: pipeline.application_id,
            worker_count: pipeline.worker_count,
            partition_count: pipeline.partition_count,
            queue_capacity: pipeline.queue_capacity,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the first config file found, and
    /// environment variables.
    ///
    /// The result is not validated: command-line flags still get applied on
    /// top, so callers run [`Config::validate`] once every layer is in.
    pub fn load() -> Result<Self> {
        let found = Self::search_paths().into_iter().find(|path| path.is_file());
        Self::load_with(found.as_deref())
    }

    /// Same as [`Config::load`] but with an explicit config file
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Config::default(),
        };

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("license-calc.toml"),
            PathBuf::from(".license-calc.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("license-calc").join("config.toml"));
        }
        paths
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        // Processing overrides
        if let Ok(val) = env::var("LICENSE_CALC_APP_ID") {
            self.processing.application_id = val;
        }
        if let Ok(val) = env::var("LICENSE_CALC_WORKERS") {
            self.processing.worker_count = val.parse().context("Invalid LICENSE_CALC_WORKERS")?;
        }
        if let Ok(val) = env::var("LICENSE_CALC_PARTITIONS") {
            self.processing.partition_count =
                val.parse().context("Invalid LICENSE_CALC_PARTITIONS")?;
        }
        if let Ok(val) = env::var("LICENSE_CALC_QUEUE_CAPACITY") {
            self.processing.queue_capacity =
                val.parse().context("Invalid LICENSE_CALC_QUEUE_CAPACITY")?;
        }

        // Dedup overrides
        if let Ok(val) = env::var("LICENSE_CALC_DEDUP_IDENTITY") {
            self.dedup.identity = val
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid LICENSE_CALC_DEDUP_IDENTITY")?;
        }

        // Path overrides
        if let Ok(val) = env::var("LICENSE_CALC_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.pipeline_options().validate()?;

        if self.processing.worker_count > 256 {
            warn!(
                worker_count = self.processing.worker_count,
                "Worker count is very high, most workers will sit idle on the lock"
            );
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "Log format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            ));
        }

        if !matches!(self.logging.output.as_str(), "console" | "file" | "both") {
            return Err(anyhow::anyhow!(
                "Log output must be 'console', 'file' or 'both', got '{}'",
                self.logging.output
            ));
        }

        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            application_id: self.processing.application_id.clone(),
            worker_count: self.processing.worker_count,
            partition_count: self.processing.partition_count,
            queue_capacity: self.processing.queue_capacity,
            identity: self.dedup.identity,
        }
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}
