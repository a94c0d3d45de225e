//! Command-line argument parsing.

use clap::Parser;
use sleuth_pipeline::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use std::path::PathBuf;

/// Sleuth - AI-assisted JavaScript analyzer.
///
/// Reads a list of JavaScript files or URLs, has an LLM explain each one and
/// writes a record per source with the explanation and any URLs or
/// credential-like tokens found in the code.
#[derive(Debug, Parser)]
#[command(name = "sleuth")]
#[command(version, about, long_about = None)]
#[command(after_help = "Example:\n  sleuth -i js_list.txt -v -t 5")]
pub struct Cli {
    /// Input file containing JS paths/URLs, one per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Increase output verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output; wins over --verbose
    #[arg(short, long)]
    pub quiet: bool,

    /// Number of simultaneous analyses, clamped to 1-10 [default: 3]
    #[arg(short = 't', long = "thread", allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// Directory for output records
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Layout of output records
    #[arg(long, value_enum)]
    pub record_format: Option<RecordFormatArg>,

    /// Format of the run summary
    #[arg(short, long, value_enum)]
    pub format: Option<CliFormat>,

    /// LLM backend
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name passed to the backend
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL override for the backend
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key for hosted backends
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for each remote fetch, in seconds
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Whether verbose output is on once --quiet is taken into account
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Requested concurrency clamped into the supported range
    pub fn thread_count(&self) -> Option<usize> {
        self.threads.map(|t| {
            t.clamp(MIN_CONCURRENCY as i64, MAX_CONCURRENCY as i64) as usize
        })
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// Record format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RecordFormatArg {
    /// Markdown sections (default)
    Markdown,
    /// One JSON object per file
    Json,
}

/// Backend options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProviderArg {
    /// Google Gemini
    Gemini,
    /// Local Ollama
    Ollama,
    /// Canned responses, no network
    Mock,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<RecordFormatArg> for sleuth_pipeline::RecordFormat {
    fn from(format: RecordFormatArg) -> Self {
        match format {
            RecordFormatArg::Markdown => sleuth_pipeline::RecordFormat::Markdown,
            RecordFormatArg::Json => sleuth_pipeline::RecordFormat::Json,
        }
    }
}

impl From<ProviderArg> for sleuth_llm::ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Gemini => sleuth_llm::ProviderKind::Gemini,
            ProviderArg::Ollama => sleuth_llm::ProviderKind::Ollama,
            ProviderArg::Mock => sleuth_llm::ProviderKind::Mock,
        }
    }
}
