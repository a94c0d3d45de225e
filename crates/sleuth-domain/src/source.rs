//! Source references - what the pipeline is asked to fetch

use std::fmt;

/// Network scheme prefixes that mark a source as remote
const REMOTE_SCHEMES: [&str; 2] = ["http://", "https://"];

/// How a source should be retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Fetched over the network
    Remote,

    /// Read from the local filesystem
    Local,
}

/// An opaque identifier of a fetchable input
///
/// A `SourceRef` is either a remote location (it starts with a recognized
/// network scheme) or a local path. It is immutable once created and is kept
/// around after fetching so the output record can be named after it.
///
/// # Examples
///
/// ```
/// use sleuth_domain::{SourceKind, SourceRef};
///
/// let remote = SourceRef::new("https://cdn.example.com/app.js");
/// assert_eq!(remote.kind(), SourceKind::Remote);
///
/// let local = SourceRef::new("static/app.js");
/// assert_eq!(local.kind(), SourceKind::Local);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceRef(String);

impl SourceRef {
    /// Create a new source reference
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw identifier as supplied by the caller
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the source by its prefix
    ///
    /// The scheme check is case-insensitive. Anything without a network
    /// scheme is treated as a local path; whether that path exists is for
    /// the fetcher to find out.
    pub fn kind(&self) -> SourceKind {
        let lowered = self.0.to_ascii_lowercase();
        if REMOTE_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
            SourceKind::Remote
        } else {
            SourceKind::Local
        }
    }

    /// Whether this source is fetched over the network
    pub fn is_remote(&self) -> bool {
        self.kind() == SourceKind::Remote
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SourceRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
