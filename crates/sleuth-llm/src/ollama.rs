//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running analysis
//! against a local model instead of a hosted service.
//!
//! # Features
//!
//! - Blocking HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Timeout handling
//!
//! Failed calls are not retried; the caller decides what a failure means.
//!
//! # Examples
//!
//! ```no_run
//! use sleuth_llm::OllamaProvider;
//! use sleuth_domain::traits::Oracle;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3");
//! let report = provider.analyze("Summarize: var x = 1;");
//! ```

use crate::http::{request_error, status_error, LazyClient};
use crate::LlmError;
use serde::{Deserialize, Serialize};
use sleuth_domain::traits::Oracle;
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama API provider for local LLM inference
///
/// This provider communicates with a local Ollama instance to generate text.
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: LazyClient,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: LazyClient::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = LazyClient::new(timeout);
        self
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("POST {} (model {}, prompt {} chars)", url, self.model, prompt.len());

        let response = self
            .client
            .get()?
            .post(&url)
            .json(&request_body)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, error_text, &self.model));
        }

        response
            .json::<OllamaGenerateResponse>()
            .map(|body| body.response)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

impl Oracle for OllamaProvider {
    type Error = LlmError;

    fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
