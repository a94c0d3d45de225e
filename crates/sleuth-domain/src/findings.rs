//! Findings extracted from raw source content

use std::collections::BTreeSet;

/// Candidate URLs and credential-like strings found in a source
///
/// Both collections have set semantics. They are kept ordered so that
/// persisted output is stable between runs; the order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    /// URL-like substrings
    pub urls: BTreeSet<String>,

    /// Candidate secret values (the captured value, not the key name)
    pub tokens: BTreeSet<String>,
}

impl Findings {
    /// Create empty findings
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.tokens.is_empty()
    }

    /// Merge another set of findings into this one
    pub fn merge(&mut self, other: Findings) {
        self.urls.extend(other.urls);
        self.tokens.extend(other.tokens);
    }
}
