//! Configuration for the pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Lowest number of simultaneous oracle calls
pub const MIN_CONCURRENCY: usize = 1;

/// Highest number of simultaneous oracle calls
pub const MAX_CONCURRENCY: usize = 10;

/// Oracle concurrency used when nothing is configured
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Per-request timeout for remote fetches (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Clamp a requested concurrency into `[MIN_CONCURRENCY, MAX_CONCURRENCY]`
///
/// ```
/// use sleuth_pipeline::clamp_concurrency;
///
/// assert_eq!(clamp_concurrency(0), 1);
/// assert_eq!(clamp_concurrency(4), 4);
/// assert_eq!(clamp_concurrency(57), 10);
/// ```
pub fn clamp_concurrency(requested: usize) -> usize {
    requested.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
}

/// On-disk layout of output records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// Human-readable markdown sections
    #[default]
    Markdown,
    /// One JSON object per record
    Json,
}

impl RecordFormat {
    /// File extension for records in this format
    pub fn extension(&self) -> &'static str {
        match self {
            RecordFormat::Markdown => "md",
            RecordFormat::Json => "json",
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Requested number of simultaneous oracle calls (clamped on use)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Maximum time for a single remote fetch (seconds)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Directory that receives one record per source
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Record layout
    #[serde(default)]
    pub record_format: RecordFormat,
}

impl PipelineConfig {
    /// Get the fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// The concurrency actually used by the analyzer
    pub fn effective_concurrency(&self) -> usize {
        clamp_concurrency(self.concurrency)
    }

    /// Validate the configuration
    ///
    /// Out-of-range concurrency is not an error; it is clamped.
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            output_dir: default_output_dir(),
            record_format: RecordFormat::Markdown,
        }
    }
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
