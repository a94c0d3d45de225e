//! Fetch results

use crate::source::SourceRef;

/// Outcome of retrieving one source
///
/// Produced exactly once per [`SourceRef`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The full text content of the source
    Content(String),

    /// Human-readable reason the source could not be retrieved
    Error(String),
}

impl FetchResult {
    /// Whether the fetch produced content
    pub fn is_content(&self) -> bool {
        matches!(self, FetchResult::Content(_))
    }

    /// The content, if any
    pub fn content(&self) -> Option<&str> {
        match self {
            FetchResult::Content(text) => Some(text),
            FetchResult::Error(_) => None,
        }
    }

    /// The error message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchResult::Content(_) => None,
            FetchResult::Error(message) => Some(message),
        }
    }
}

/// A fetch result keyed by the source it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The source that was fetched
    pub source: SourceRef,

    /// What the fetch produced
    pub result: FetchResult,
}

impl FetchOutcome {
    /// Pair a source with its result
    pub fn new(source: SourceRef, result: FetchResult) -> Self {
        Self { source, result }
    }
}
