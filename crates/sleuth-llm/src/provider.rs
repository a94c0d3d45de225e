//! Runtime provider selection

use crate::config::{ProviderConfig, ProviderKind};
use crate::{GeminiProvider, LlmError, MockProvider, OllamaProvider};
use sleuth_domain::traits::Oracle;
use tracing::info;

/// Response used by the mock backend when selected from configuration
pub const MOCK_RESPONSE: &str = "Mock analysis: no issues reported.";

/// One of the supported oracle backends, chosen at startup
#[derive(Debug)]
pub enum Provider {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Canned responses
    Mock(MockProvider),
}

impl Provider {
    /// Build the provider described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a hosted backend
    /// is selected without an API key.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Other)?;

        let provider = match config.kind {
            ProviderKind::Gemini => {
                let api_key = config
                    .api_key
                    .clone()
                    .ok_or_else(|| LlmError::MissingApiKey("gemini".to_string()))?;
                let mut gemini = GeminiProvider::new(api_key, config.model.clone())?
                    .with_timeout(config.timeout());
                if let Some(endpoint) = &config.endpoint {
                    gemini = gemini.with_endpoint(endpoint.clone());
                }
                Provider::Gemini(gemini)
            }
            ProviderKind::Ollama => {
                let ollama = match &config.endpoint {
                    Some(endpoint) => OllamaProvider::new(endpoint.clone(), config.model.clone()),
                    None => OllamaProvider::default_endpoint(config.model.clone()),
                };
                Provider::Ollama(ollama.with_timeout(config.timeout()))
            }
            ProviderKind::Mock => Provider::Mock(MockProvider::new(MOCK_RESPONSE)),
        };

        info!("Using {} provider (model {})", config.kind.as_str(), provider.model_name());
        Ok(provider)
    }

    /// Which backend this is
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Gemini(_) => ProviderKind::Gemini,
            Provider::Ollama(_) => ProviderKind::Ollama,
            Provider::Mock(_) => ProviderKind::Mock,
        }
    }
}

impl Oracle for Provider {
    type Error = LlmError;

    fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            Provider::Gemini(p) => p.analyze(prompt),
            Provider::Ollama(p) => p.analyze(prompt),
            Provider::Mock(p) => p.analyze(prompt),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Gemini(p) => p.model_name(),
            Provider::Ollama(p) => p.model_name(),
            Provider::Mock(p) => p.model_name(),
        }
    }
}
