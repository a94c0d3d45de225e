//! Sleuth Domain Layer
//!
//! This crate holds the data model shared by every other Sleuth crate. It has
//! no external dependencies and performs no I/O: it defines the values that
//! flow through the pipeline and the capability traits that infrastructure
//! crates implement.
//!
//! ## Key Concepts
//!
//! - **SourceRef**: An opaque identifier of something to fetch (URL or local path)
//! - **FetchResult**: Content or error, produced exactly once per source
//! - **AnalysisResult**: Oracle report or error, positionally tied to its input
//! - **Findings**: Deduplicated URLs and credential-like tokens found in raw content
//! - **OutputRecord**: The terminal, write-once artifact for one source
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure values only
//! - Trait definitions for all external interactions (see [`traits`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod fetch;
pub mod findings;
pub mod record;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use analysis::AnalysisResult;
pub use fetch::{FetchOutcome, FetchResult};
pub use findings::Findings;
pub use record::OutputRecord;
pub use source::{SourceKind, SourceRef};
