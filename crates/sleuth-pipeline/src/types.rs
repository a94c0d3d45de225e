//! Result and progress types for a pipeline run

use sleuth_domain::{OutputRecord, SourceRef};
use std::sync::Arc;
use uuid::Uuid;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier of this run, for log correlation
    pub run_id: Uuid,

    /// Records written, in input order
    pub records: Vec<OutputRecord>,

    /// Sources whose fetch failed, in input order
    pub skipped: Vec<SkippedSource>,

    /// Records that were built but could not be persisted
    pub write_failures: Vec<WriteFailure>,
}

impl RunReport {
    /// An empty report for a new run
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            records: Vec::new(),
            skipped: Vec::new(),
            write_failures: Vec::new(),
        }
    }

    /// Number of records whose analysis is an error
    pub fn analysis_failures(&self) -> usize {
        self.records.iter().filter(|r| r.analysis.is_error()).count()
    }

    /// Whether every source was fetched, analyzed and persisted
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.write_failures.is_empty() && self.analysis_failures() == 0
    }
}

/// A source that was dropped after its fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    /// The source as it appeared in the input
    pub source: SourceRef,

    /// Fetch error message
    pub reason: String,
}

/// A record that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// The source the record belongs to
    pub source: SourceRef,

    /// Write error message
    pub reason: String,
}

/// Emitted once per completed oracle call, in completion order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisProgress {
    /// Zero-based position of the item among the analyzed inputs
    pub index: usize,

    /// Calls completed so far, including this one
    pub completed: usize,

    /// Total number of calls in this batch
    pub total: usize,

    /// Whether this call produced a report
    pub succeeded: bool,
}

/// Callback invoked with each [`AnalysisProgress`]
pub type ProgressHook = Arc<dyn Fn(AnalysisProgress) + Send + Sync>;

/// Outcome of the fetch stage, reported before any oracle call is made
#[derive(Debug, Clone, Copy)]
pub struct FetchSummary<'a> {
    /// Sources whose fetch failed, in input order
    pub skipped: &'a [SkippedSource],

    /// Sources that will be analyzed
    pub valid: usize,
}

/// Callback invoked once per run with the [`FetchSummary`]
pub type FetchHook = Arc<dyn Fn(FetchSummary<'_>) + Send + Sync>;
