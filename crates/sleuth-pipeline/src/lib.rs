//! Sleuth Pipeline
//!
//! Fetches JavaScript sources, reformats them, has an oracle analyze each one
//! and writes a record per source with the oracle's report and the URLs and
//! credential-like tokens found in the raw text.
//!
//! # Architecture
//!
//! ```text
//! sources → Fetcher → Normalizer → Analyzer (oracle) ─┐
//!               └──── raw text → Extractor ───────────┴→ Recorder → records
//! ```
//!
//! # Key Features
//!
//! - **Concurrent fetch**: every source requested at once, results in input order
//! - **Bounded analysis**: at most 1 to 10 oracle calls in flight
//! - **Per-item failures**: a bad source, a failed oracle call or a failed
//!   write never aborts the batch
//! - **Markdown or JSON records**: one file per source
//!
//! # Example Usage
//!
//! ```no_run
//! use sleuth_llm::MockProvider;
//! use sleuth_pipeline::{load_sources, Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = load_sources(Path::new("js_list.txt"))?;
//! let pipeline = Pipeline::new(PipelineConfig::default(), MockProvider::default())?;
//!
//! let report = pipeline.run(sources).await?;
//!
//! println!("Saved: {} records", report.records.len());
//! println!("Skipped: {} sources", report.skipped.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod extractor;
mod fetcher;
mod normalizer;
mod pipeline;
mod prompt;
mod recorder;
mod types;


pub use analyzer::Analyzer;
pub use config::{
    clamp_concurrency, PipelineConfig, RecordFormat, DEFAULT_CONCURRENCY,
    DEFAULT_FETCH_TIMEOUT_SECS, MAX_CONCURRENCY, MIN_CONCURRENCY,
};
pub use error::{FetchError, PipelineError, RecordError};
pub use extractor::extract;
pub use fetcher::Fetcher;
pub use normalizer::normalize;
pub use pipeline::{load_sources, parse_sources, Pipeline};
pub use prompt::PromptBuilder;
pub use recorder::{derive_id, render_json, render_markdown, Recorder};
pub use types::{
    AnalysisProgress, FetchHook, FetchSummary, ProgressHook, RunReport, SkippedSource, WriteFailure,
};
