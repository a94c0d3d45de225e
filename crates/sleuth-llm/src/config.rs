//! Provider selection and connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model for the Gemini backend
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout for oracle calls (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which backend answers analysis prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Generative Language API
    #[default]
    Gemini,
    /// Local Ollama instance
    Ollama,
    /// Canned responses, no network
    Mock,
}

impl ProviderKind {
    /// Lowercase name, as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Mock => "mock",
        }
    }
}

/// Configuration for building a [`crate::Provider`]
///
/// The API key is accepted on deserialization but never written back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend to use
    #[serde(default)]
    pub kind: ProviderKind,

    /// Model name passed to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for the backend's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Credential for hosted backends
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Gemini,
            model: default_model(),
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
