//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sleuth_llm::ProviderConfig;
use sleuth_pipeline::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Oracle backend settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default summary format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sleuth").join("config.toml"))
    }

    /// Load configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the configuration for this invocation.
    ///
    /// An explicit `--config` file must exist. Otherwise the default file is
    /// used if present, and built-in defaults if not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(threads) = cli.thread_count() {
            self.pipeline.concurrency = threads;
        }
        if let Some(dir) = &cli.output_dir {
            self.pipeline.output_dir = dir.clone();
        }
        if let Some(format) = cli.record_format {
            self.pipeline.record_format = format.into();
        }
        if let Some(secs) = cli.fetch_timeout {
            self.pipeline.fetch_timeout_secs = secs;
        }
        if let Some(provider) = cli.provider {
            self.provider.kind = provider.into();
        }
        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }
        if let Some(endpoint) = &cli.endpoint {
            self.provider.endpoint = Some(endpoint.clone());
        }
        if let Some(key) = &cli.api_key {
            self.provider.api_key = Some(key.clone());
        }
        if let Some(format) = cli.format {
            self.settings.format = format.into();
        }
        if cli.no_color {
            self.settings.color = false;
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().map_err(CliError::Config)?;
        self.provider.validate().map_err(CliError::Config)?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
