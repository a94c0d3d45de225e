//! Sleuth CLI - analyze JavaScript sources with an LLM.

use anyhow::Context;
use clap::Parser;
use sleuth_cli::{Cli, Config, Formatter};
use sleuth_llm::Provider;
use sleuth_pipeline::{load_sources, AnalysisProgress, FetchSummary, Pipeline};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // API_KEY may come from a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.is_verbose());

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over -v
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,sleuth=debug,sleuth_cli=debug,sleuth_llm=debug,sleuth_pipeline=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config, then let flags override it
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    config.validate()?;
    debug!(
        "Provider {} (model {}), pipeline {:?}",
        config.provider.kind.as_str(),
        config.provider.model,
        config.pipeline
    );

    let formatter = Formatter::new(config.settings.format, config.settings.color);

    let sources = load_sources(&cli.input)?;
    let provider = Provider::from_config(&config.provider).context("Failed to set up the LLM provider")?;

    let threads = config.pipeline.effective_concurrency();
    let mut pipeline = Pipeline::new(config.pipeline.clone(), provider)?;

    let verbose = cli.is_verbose();
    if verbose {
        let progress_formatter = formatter.clone();
        pipeline = pipeline.with_progress(Arc::new(move |progress: AnalysisProgress| {
            println!("{}", progress_formatter.progress(&progress));
        }));
    }

    // Skips and the count of files sent for analysis go out once fetching is done
    if !cli.quiet {
        let fetch_formatter = formatter.clone();
        pipeline = pipeline.with_fetch_hook(Arc::new(move |summary: FetchSummary<'_>| {
            for skipped in summary.skipped {
                println!("{}", fetch_formatter.skipped(skipped.source.as_str(), &skipped.reason));
            }
            if summary.valid > 0 {
                println!("{}", fetch_formatter.starting(summary.valid, threads));
            }
        }));
    }

    let report = pipeline.run(sources).await?;

    for failure in &report.write_failures {
        eprintln!(
            "{}",
            formatter.error(&format!("Could not save {}: {}", failure.source, failure.reason))
        );
    }

    if report.records.is_empty() && report.write_failures.is_empty() {
        if !cli.quiet {
            println!("{}", formatter.warning("No valid JS files found."));
        }
        return Ok(());
    }

    if verbose {
        for record in &report.records {
            println!("{}", formatter.saved(&record.path));
        }
    }

    if !cli.quiet {
        println!("{}", formatter.format_summary(&report)?);
    }

    Ok(())
}
