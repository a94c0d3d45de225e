//! Persistence of output records

use crate::config::RecordFormat;
use crate::error::RecordError;
use sleuth_domain::{AnalysisResult, Findings, OutputRecord, SourceKind, SourceRef};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters that may not appear in a record id
const UNSAFE_ID_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Id used when nothing is left of the source name
const FALLBACK_ID: &str = "index";

/// Derive a storage-safe identifier from a source
///
/// Takes the last path segment, drops any query string or fragment, strips
/// a trailing `.js` and replaces characters that are unsafe in file names
/// with `_`. Different sources can derive the same id.
///
/// ```
/// use sleuth_pipeline::derive_id;
/// use sleuth_domain::SourceRef;
///
/// assert_eq!(derive_id(&SourceRef::new("https://cdn.test/js/app.min.js?v=3")), "app.min");
/// assert_eq!(derive_id(&SourceRef::new("https://cdn.test/")), "index");
/// ```
pub fn derive_id(source: &SourceRef) -> String {
    let raw = source.as_str();

    // A remote query or fragment may itself contain slashes
    let raw = match source.kind() {
        SourceKind::Remote => raw.split(['?', '#']).next().unwrap_or(raw),
        SourceKind::Local => raw,
    };

    let segment = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let segment = segment.split(['?', '#']).next().unwrap_or(segment);
    let stem = segment.strip_suffix(".js").unwrap_or(segment);

    let id: String = stem
        .chars()
        .map(|c| if UNSAFE_ID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    if id.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        id
    }
}

/// Writes one record per analyzed source into an output directory
#[derive(Debug, Clone)]
pub struct Recorder {
    output_dir: PathBuf,
    format: RecordFormat,
}

impl Recorder {
    /// Create a recorder writing `format` records into `output_dir`
    ///
    /// The directory is created on the first write, not here.
    pub fn new(output_dir: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Directory records are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the record for `id` goes
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", id, self.format.extension()))
    }

    /// Persist the record for one source
    ///
    /// An existing record with the same id is overwritten.
    pub fn record(
        &self,
        source: &SourceRef,
        analysis: AnalysisResult,
        findings: Findings,
    ) -> Result<OutputRecord, RecordError> {
        let id = derive_id(source);
        let path = self.path_for(&id);

        let record = OutputRecord {
            id,
            source: source.clone(),
            analysis,
            findings,
            path,
        };

        let body = match self.format {
            RecordFormat::Markdown => render_markdown(&record),
            RecordFormat::Json => render_json(&record)?,
        };

        fs::create_dir_all(&self.output_dir).map_err(|e| RecordError::Io {
            path: self.output_dir.clone(),
            source: e,
        })?;
        fs::write(&record.path, body).map_err(|e| RecordError::Io {
            path: record.path.clone(),
            source: e,
        })?;

        debug!("Saved record for {} to {}", record.source, record.path.display());
        Ok(record)
    }
}

/// Markdown layout: the report, then the URLs, then the tokens
pub fn render_markdown(record: &OutputRecord) -> String {
    let analysis = match &record.analysis {
        AnalysisResult::Report(text) => text.clone(),
        AnalysisResult::Error(message) => format!("[ERROR] {}", message),
    };
    let urls: Vec<&str> = record.findings.urls.iter().map(String::as_str).collect();
    let tokens: Vec<&str> = record.findings.tokens.iter().map(String::as_str).collect();

    format!(
        "## AI Explanation\n{}\n\n## Extracted URLs:\n{}\n\n## Extracted Tokens:\n{}\n",
        analysis,
        urls.join("\n"),
        tokens.join("\n")
    )
}

/// JSON layout
pub fn render_json(record: &OutputRecord) -> Result<String, RecordError> {
    let value = serde_json::json!({
        "id": record.id,
        "source": record.source.as_str(),
        "analysis": {
            "status": record.analysis.status(),
            "text": record.analysis.text(),
        },
        "findings": {
            "urls": record.findings.urls,
            "tokens": record.findings.tokens,
        },
    });

    Ok(serde_json::to_string_pretty(&value)?)
}
