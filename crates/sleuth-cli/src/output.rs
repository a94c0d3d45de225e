//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use sleuth_pipeline::{AnalysisProgress, RunReport};
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the end-of-run summary.
    pub fn format_summary(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_summary_json(report),
            OutputFormat::Table => self.format_summary_table(report),
        }
    }

    /// Format the summary as JSON.
    fn format_summary_json(&self, report: &RunReport) -> Result<String> {
        let records: Vec<serde_json::Value> = report
            .records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "source": r.source.as_str(),
                    "id": r.id,
                    "path": r.path.display().to_string(),
                    "status": r.analysis.status(),
                    "urls": r.findings.urls.len(),
                    "tokens": r.findings.tokens.len()
                })
            })
            .collect();

        let skipped: Vec<serde_json::Value> = report
            .skipped
            .iter()
            .map(|s| serde_json::json!({ "source": s.source.as_str(), "reason": s.reason }))
            .collect();

        let write_failures: Vec<serde_json::Value> = report
            .write_failures
            .iter()
            .map(|w| serde_json::json!({ "source": w.source.as_str(), "reason": w.reason }))
            .collect();

        let summary = serde_json::json!({
            "run_id": report.run_id.to_string(),
            "records": records,
            "skipped": skipped,
            "write_failures": write_failures
        });

        Ok(serde_json::to_string_pretty(&summary)?)
    }

    /// Format the summary as a table.
    fn format_summary_table(&self, report: &RunReport) -> Result<String> {
        if report.records.is_empty() && report.write_failures.is_empty() {
            return Ok(self.colorize("No records written.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Record", "Analysis", "URLs", "Tokens"]);

        for record in &report.records {
            builder.push_record([
                record.source.to_string(),
                record.path.display().to_string(),
                record.analysis.status().to_string(),
                record.findings.urls.len().to_string(),
                record.findings.tokens.len().to_string(),
            ]);
        }

        for failure in &report.write_failures {
            builder.push_record([
                failure.source.to_string(),
                "-".to_string(),
                "not saved".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Notice for a source whose fetch failed.
    pub fn skipped(&self, source: &str, reason: &str) -> String {
        self.colorize(&format!("[!] Skipped {}: {}", source, reason), "yellow")
    }

    /// Announce the run.
    pub fn starting(&self, count: usize, threads: usize) -> String {
        self.info(&format!(
            "Sending {} files for analysis with {} threads. This may take some time...",
            count, threads
        ))
    }

    /// Per-completion progress line.
    pub fn progress(&self, progress: &AnalysisProgress) -> String {
        let line = format!("[+] Finished explanation for file #{}", progress.index + 1);
        if progress.succeeded {
            self.colorize(&line, "cyan")
        } else {
            self.colorize(&line, "magenta")
        }
    }

    /// Per-record save line.
    pub fn saved(&self, path: &Path) -> String {
        self.success(&format!("Saved: {}", path.display()))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_domain::{AnalysisResult, Findings, OutputRecord, SourceRef};
    use sleuth_pipeline::{SkippedSource, WriteFailure};
    use std::path::PathBuf;
    use uuid::Uuid;

    fn create_test_report() -> RunReport {
        let mut findings = Findings::new();
        findings.urls.insert("https://api.test".to_string());
        findings.tokens.insert("abc12345".to_string());

        let mut report = RunReport::new(Uuid::nil());
        report.records.push(OutputRecord {
            id: "a".to_string(),
            source: SourceRef::new("a.js"),
            analysis: AnalysisResult::Report("fine".to_string()),
            findings,
            path: PathBuf::from("output/a.md"),
        });
        report.skipped.push(SkippedSource {
            source: SourceRef::new("http://x/y.js"),
            reason: "HTTP 404".to_string(),
        });
        report
    }

    #[test]
    fn test_json_summary() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_summary(&create_test_report()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["records"][0]["source"], "a.js");
        assert_eq!(value["records"][0]["status"], "report");
        assert_eq!(value["records"][0]["tokens"], 1);
        assert_eq!(value["skipped"][0]["reason"], "HTTP 404");
        assert!(value["write_failures"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_table_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&create_test_report()).unwrap();
        assert!(output.contains("Source"));
        assert!(output.contains("a.js"));
        assert!(output.contains("report"));
    }

    #[test]
    fn test_table_lists_write_failures() {
        let mut report = create_test_report();
        report.write_failures.push(WriteFailure {
            source: SourceRef::new("b.js"),
            reason: "Failed to write".to_string(),
        });

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&report).unwrap();
        assert!(output.contains("b.js"));
        assert!(output.contains("not saved"));
    }

    #[test]
    fn test_empty_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&RunReport::new(Uuid::nil())).unwrap();
        assert!(output.contains("No records written"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.skipped("x.js", "Invalid path"), "[!] Skipped x.js: Invalid path");
    }

    #[test]
    fn test_starting_counts_valid_files() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let line = formatter.starting(2, 5);
        assert!(line.contains("Sending 2 files"));
        assert!(line.contains("5 threads"));
    }

    #[test]
    fn test_progress_is_one_based() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let line = formatter.progress(&AnalysisProgress {
            index: 0,
            completed: 1,
            total: 2,
            succeeded: true,
        });
        assert_eq!(line, "[+] Finished explanation for file #1");
    }
}
