//! Output records - the terminal artifact of the pipeline

use crate::analysis::AnalysisResult;
use crate::findings::Findings;
use crate::source::SourceRef;
use std::path::PathBuf;

/// One persisted result for one successfully fetched source
///
/// Written once and never updated. Two sources that derive the same `id`
/// share a storage location; the later write wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// Storage-safe identifier derived from the source
    pub id: String,

    /// The source this record describes
    pub source: SourceRef,

    /// Oracle report, or the error that stands in its place
    pub analysis: AnalysisResult,

    /// Findings extracted from the raw content
    pub findings: Findings,

    /// Where the record was written
    pub path: PathBuf,
}
