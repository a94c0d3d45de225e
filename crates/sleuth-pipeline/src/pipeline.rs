//! The end-to-end run: fetch, normalize, analyze, extract, record

use crate::analyzer::Analyzer;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extractor::extract;
use crate::fetcher::Fetcher;
use crate::normalizer::normalize;
use crate::recorder::Recorder;
use crate::types::{FetchHook, FetchSummary, ProgressHook, RunReport, SkippedSource, WriteFailure};
use sleuth_domain::traits::Oracle;
use sleuth_domain::{FetchResult, SourceRef};
use std::fmt::Display;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// A configured pipeline, reusable across runs
pub struct Pipeline<O> {
    fetcher: Fetcher,
    analyzer: Analyzer<O>,
    recorder: Recorder,
    fetch_hook: Option<FetchHook>,
}

impl<O> Pipeline<O>
where
    O: Oracle + Send + Sync + 'static,
    O::Error: Display,
{
    /// Build a pipeline from `config` around `oracle`
    pub fn new(config: PipelineConfig, oracle: O) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let fetcher = Fetcher::new(config.fetch_timeout())?;
        let analyzer = Analyzer::new(oracle, config.effective_concurrency());
        let recorder = Recorder::new(config.output_dir, config.record_format);

        Ok(Self {
            fetcher,
            analyzer,
            recorder,
            fetch_hook: None,
        })
    }

    /// Replace the recorder built from the configuration
    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = recorder;
        self
    }

    /// Report each completed oracle call to `hook`
    pub fn with_progress(mut self, hook: ProgressHook) -> Self {
        self.analyzer = self.analyzer.with_progress(hook);
        self
    }

    /// Report the fetch stage's outcome to `hook` before analysis starts
    pub fn with_fetch_hook(mut self, hook: FetchHook) -> Self {
        self.fetch_hook = Some(hook);
        self
    }

    /// The recorder used for output
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Run the whole batch
    ///
    /// Fails only when `sources` is empty. Every other problem is confined
    /// to its item and shows up in the report: a failed fetch as a skipped
    /// source, a failed oracle call as an error record, a failed write as a
    /// write failure.
    pub async fn run(&self, sources: Vec<SourceRef>) -> Result<RunReport, PipelineError> {
        if sources.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut report = RunReport::new(Uuid::now_v7());
        info!("Starting run {} with {} sources", report.run_id, sources.len());

        let outcomes = self.fetcher.fetch_all(&sources).await;

        let mut valid = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                FetchResult::Content(content) => valid.push((outcome.source, content)),
                FetchResult::Error(reason) => report.skipped.push(SkippedSource {
                    source: outcome.source,
                    reason,
                }),
            }
        }

        if let Some(hook) = &self.fetch_hook {
            hook(FetchSummary {
                skipped: &report.skipped,
                valid: valid.len(),
            });
        }

        if valid.is_empty() {
            warn!("No valid JS sources in run {}", report.run_id);
            return Ok(report);
        }

        let normalized: Vec<String> = valid.iter().map(|(_, raw)| normalize(raw)).collect();
        let analyses = self.analyzer.analyze_all(normalized).await;

        for ((source, raw), analysis) in valid.into_iter().zip(analyses) {
            let findings = extract(&raw);
            match self.recorder.record(&source, analysis, findings) {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    warn!("Failed to save record for {}: {}", source, e);
                    report.write_failures.push(WriteFailure {
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Run {} finished: {} records, {} skipped, {} analysis errors, {} write failures",
            report.run_id,
            report.records.len(),
            report.skipped.len(),
            report.analysis_failures(),
            report.write_failures.len()
        );

        Ok(report)
    }
}

/// Split a newline-delimited source list into sources
///
/// Lines are trimmed; blank lines are dropped.
pub fn parse_sources(text: &str) -> Vec<SourceRef> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(SourceRef::from)
        .collect()
}

/// Read the source list at `path`
pub fn load_sources(path: &Path) -> Result<Vec<SourceRef>, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sources = parse_sources(&text);
    if sources.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    Ok(sources)
}
