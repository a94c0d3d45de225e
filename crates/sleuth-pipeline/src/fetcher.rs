//! Fetch stage: retrieve every source's text

use crate::error::{FetchError, PipelineError};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use sleuth_domain::{FetchOutcome, FetchResult, SourceKind, SourceRef};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retrieves source text from the network or the local filesystem
///
/// One shared [`Client`] serves every remote request, so connections are
/// reused across a batch.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher whose remote requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch every source concurrently
    ///
    /// Returns exactly one outcome per source, in input order, whatever
    /// order the requests complete in.
    pub async fn fetch_all(&self, sources: &[SourceRef]) -> Vec<FetchOutcome> {
        info!("Fetching {} sources", sources.len());

        let outcomes = join_all(sources.iter().map(|source| async move {
            let result = match self.fetch(source).await {
                Ok(content) => {
                    debug!("Fetched {} ({} bytes)", source, content.len());
                    FetchResult::Content(content)
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}", source, e);
                    FetchResult::Error(e.to_string())
                }
            };
            FetchOutcome::new(source.clone(), result)
        }))
        .await;

        let fetched = outcomes.iter().filter(|o| o.result.is_content()).count();
        info!("Fetched {}/{} sources", fetched, outcomes.len());

        outcomes
    }

    /// Fetch a single source
    pub async fn fetch(&self, source: &SourceRef) -> Result<String, FetchError> {
        match source.kind() {
            SourceKind::Remote => self.fetch_remote(source.as_str()).await,
            SourceKind::Local => fetch_local(Path::new(source.as_str())).await,
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(transport_error)
    }
}

/// Map a reqwest failure to a fetch error naming its cause
///
/// reqwest's `Display` stops at the outermost error, so the source chain is
/// appended to tell a timeout from a refused connection or a DNS failure.
fn transport_error(e: reqwest::Error) -> FetchError {
    let kind = if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_decode() || e.is_body() {
        "bad response body"
    } else {
        "transport error"
    };

    let mut message = format!("{}: {}", kind, e);
    let mut cause = std::error::Error::source(&e);
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }

    FetchError::Transport(message)
}

async fn fetch_local(path: &Path) -> Result<String, FetchError> {
    if tokio::fs::metadata(path).await.is_err() {
        return Err(FetchError::InvalidSource);
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::Read(e.to_string()))
}
