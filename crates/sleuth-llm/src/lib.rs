//! Sleuth LLM Provider Layer
//!
//! Pluggable oracle implementations for the analysis stage.
//!
//! # Architecture
//!
//! This crate provides implementations of the `Oracle` trait from
//! `sleuth-domain`. Every backend turns a prompt into a textual report and
//! reports failures through [`LlmError`]; the pipeline never sees anything
//! more specific than the error's display text.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API
//! - `OllamaProvider`: Local Ollama API integration
//! - `Provider`: Runtime selection of one of the above from [`ProviderConfig`]
//!
//! # Examples
//!
//! ```
//! use sleuth_llm::MockProvider;
//! use sleuth_domain::traits::Oracle;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.analyze("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod gemini;
mod http;
pub mod ollama;
pub mod provider;

use sleuth_domain::traits::Oracle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use config::{ProviderConfig, ProviderKind};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use provider::Provider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The provider needs an API key and none was configured
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Reply configured for a specific prompt
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// It's useful for testing and development.
///
/// # Examples
///
/// ```
/// use sleuth_llm::MockProvider;
/// use sleuth_domain::traits::Oracle;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.analyze("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.analyze("prompt1").unwrap(), "response1");
/// assert_eq!(provider.analyze("prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            latency: None,
        }
    }

    /// Sleep for `latency` on every call before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Fail);
    }

    /// Get the number of times analyze was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl Oracle for MockProvider {
    type Error = LlmError;

    fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        match lock(&self.responses).get(prompt) {
            Some(MockReply::Text(response)) => Ok(response.clone()),
            Some(MockReply::Fail) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
