//! Pattern-based findings extraction
//!
//! Purely syntactic: nothing here checks whether a URL resolves or a token is
//! a live credential. False positives are expected.

use regex::Regex;
use sleuth_domain::Findings;
use std::sync::LazyLock;

/// `http`/`https` followed by anything up to whitespace or a quote
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s'"]+"#).expect("URL pattern is valid"));

/// A key name (`api_key`, `api-key`, `apikey`, `token`, `secret`), a separator
/// run, an optional quote, then a captured value of 8+ word chars or hyphens
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:api[_-]?key|token|secret)[\s=:]+["']?([\w-]{8,})"#)
        .expect("token pattern is valid")
});

/// Extract candidate URLs and credential values from raw content
///
/// Run this on the fetched text, not the normalized text, so reformatting
/// cannot split or merge a match.
///
/// ```
/// use sleuth_pipeline::extract;
///
/// let findings = extract(r#"fetch("https://api.example.com/v1"); const token = "abc12345";"#);
/// assert!(findings.urls.contains("https://api.example.com/v1"));
/// assert!(findings.tokens.contains("abc12345"));
/// ```
pub fn extract(raw: &str) -> Findings {
    let urls = URL_PATTERN
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect();

    let tokens = TOKEN_PATTERN
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Findings { urls, tokens }
}
