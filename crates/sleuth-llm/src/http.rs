//! Shared HTTP plumbing for hosted providers

use crate::LlmError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::sync::OnceLock;
use std::time::Duration;

/// A blocking HTTP client built on first use
///
/// The blocking client owns an internal runtime, so it must be created and
/// driven from a thread that is allowed to block. Building it lazily inside
/// the first oracle call keeps construction off async executor threads.
#[derive(Debug)]
pub(crate) struct LazyClient {
    timeout: Duration,
    cell: OnceLock<Result<Client, String>>,
}

impl LazyClient {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cell: OnceLock::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn get(&self) -> Result<&Client, LlmError> {
        self.cell
            .get_or_init(|| {
                Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))
    }
}

/// Map a non-success status to an error
pub(crate) fn status_error(status: StatusCode, body: String, model: &str) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

/// Map a transport failure to an error
pub(crate) fn request_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Communication(format!("Request timed out: {}", e))
    } else {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new(), "m"),
            LlmError::RateLimitExceeded
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, String::new(), "m"),
            LlmError::ModelNotAvailable(ref model) if model == "m"
        ));
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string(), "m") {
            LlmError::Communication(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("boom"));
            }
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    #[test]
    fn test_lazy_client_keeps_timeout() {
        let client = LazyClient::new(Duration::from_secs(7));
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }
}
