//! Analyze stage: bounded-concurrency oracle calls
//!
//! Every input gets its own task. A semaphore admits at most `limit` of them
//! into the oracle at once, and each admitted call runs on the blocking pool
//! since [`Oracle`] is synchronous. Tasks hand back their input index with
//! the result, so the output is filled slot by slot in input order no matter
//! which call finishes first.

use crate::config::clamp_concurrency;
use crate::prompt::PromptBuilder;
use crate::types::{AnalysisProgress, ProgressHook};
use futures::stream::{FuturesUnordered, StreamExt};
use sleuth_domain::traits::Oracle;
use sleuth_domain::AnalysisResult;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Runs the oracle over a batch of normalized texts
pub struct Analyzer<O> {
    oracle: Arc<O>,
    limit: usize,
    progress: Option<ProgressHook>,
}

impl<O> Analyzer<O>
where
    O: Oracle + Send + Sync + 'static,
    O::Error: Display,
{
    /// Create an analyzer allowing `limit` simultaneous oracle calls
    ///
    /// `limit` is clamped into `[1, 10]`.
    pub fn new(oracle: O, limit: usize) -> Self {
        Self::from_shared(Arc::new(oracle), limit)
    }

    /// Create an analyzer around an oracle that is shared elsewhere
    pub fn from_shared(oracle: Arc<O>, limit: usize) -> Self {
        Self {
            oracle,
            limit: clamp_concurrency(limit),
            progress: None,
        }
    }

    /// Report each completed call to `hook`
    pub fn with_progress(mut self, hook: ProgressHook) -> Self {
        self.progress = Some(hook);
        self
    }

    /// The effective concurrency limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Analyze every text, returning one result per input in input order
    ///
    /// A failing call only affects its own slot.
    pub async fn analyze_all(&self, texts: Vec<String>) -> Vec<AnalysisResult> {
        let total = texts.len();
        if total == 0 {
            return Vec::new();
        }

        info!(
            "Analyzing {} inputs with {} (limit {})",
            total,
            self.oracle.model_name(),
            self.limit
        );

        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut tasks = FuturesUnordered::new();

        for (index, text) in texts.into_iter().enumerate() {
            let oracle = Arc::clone(&self.oracle);
            let semaphore = Arc::clone(&semaphore);
            tasks.push(async move {
                let handle = tokio::spawn(run_one(oracle, semaphore, text));
                (index, handle.await)
            });
        }

        let mut slots: Vec<Option<AnalysisResult>> = vec![None; total];
        let mut completed = 0;

        while let Some((index, joined)) = tasks.next().await {
            let result = match joined {
                Ok(Ok(report)) => AnalysisResult::Report(report),
                Ok(Err(cause)) => AnalysisResult::Error(format!("Oracle failed: {}", cause)),
                Err(e) => AnalysisResult::Error(format!("Oracle failed: {}", e)),
            };

            completed += 1;
            match &result {
                AnalysisResult::Report(_) => debug!("Analysis {} finished ({}/{})", index, completed, total),
                AnalysisResult::Error(message) => warn!("Analysis {} failed: {}", index, message),
            }

            if let Some(hook) = &self.progress {
                hook(AnalysisProgress {
                    index,
                    completed,
                    total,
                    succeeded: result.is_report(),
                });
            }

            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| AnalysisResult::Error("Oracle failed: no result".to_string()))
            })
            .collect()
    }
}

/// One admitted oracle call
async fn run_one<O>(oracle: Arc<O>, semaphore: Arc<Semaphore>, text: String) -> Result<String, String>
where
    O: Oracle + Send + Sync + 'static,
    O::Error: Display,
{
    let _permit = semaphore.acquire_owned().await.map_err(|e| e.to_string())?;
    let prompt = PromptBuilder::new(&text).build();

    // Call in a blocking context since Oracle is not async
    tokio::task::spawn_blocking(move || {
        oracle
            .analyze(&prompt)
            .map(|report| report.trim().to_string())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    /// Echoes the code between the prompt delimiters
    struct Echo;

    impl Oracle for Echo {
        type Error = String;

        fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
            let code = prompt
                .rsplit("---\n")
                .nth(1)
                .ok_or_else(|| "no code block".to_string())?;
            Ok(format!("  report for {}  \n", code.trim()))
        }
    }

    struct FailsOn(&'static str);

    impl Oracle for FailsOn {
        type Error = String;

        fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
            if prompt.contains(self.0) {
                Err("quota exceeded".to_string())
            } else {
                Ok("fine".to_string())
            }
        }
    }

    struct Panics;

    impl Oracle for Panics {
        type Error = String;

        fn analyze(&self, _prompt: &str) -> Result<String, Self::Error> {
            panic!("oracle blew up");
        }
    }

    #[tokio::test]
    async fn test_reports_are_trimmed_and_ordered() {
        let analyzer = Analyzer::new(Echo, 2);
        let results = analyzer
            .analyze_all(vec!["a();".into(), "b();".into(), "c();".into()])
            .await;

        assert_eq!(
            results,
            vec![
                AnalysisResult::Report("report for a();".into()),
                AnalysisResult::Report("report for b();".into()),
                AnalysisResult::Report("report for c();".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let analyzer = Analyzer::new(Panics, 3);
        assert!(analyzer.analyze_all(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_error_is_isolated_to_its_slot() {
        let analyzer = Analyzer::new(FailsOn("bad"), 3);
        let results = analyzer
            .analyze_all(vec!["good".into(), "bad".into(), "good".into()])
            .await;

        assert!(results[0].is_report());
        assert_eq!(results[1], AnalysisResult::Error("Oracle failed: quota exceeded".into()));
        assert!(results[2].is_report());
    }

    #[tokio::test]
    async fn test_panicking_oracle_becomes_error() {
        let analyzer = Analyzer::new(Panics, 1);
        let results = analyzer.analyze_all(vec!["x".into()]).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_error());
        assert!(results[0].text().starts_with("Oracle failed:"));
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(Analyzer::new(Echo, 0).limit(), 1);
        assert_eq!(Analyzer::new(Echo, 57).limit(), 10);
        assert_eq!(Analyzer::new(Echo, 4).limit(), 4);
    }

    struct Gauge {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Oracle for Gauge {
        type Error = String;

        fn analyze(&self, _prompt: &str) -> Result<String, Self::Error> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("done".to_string())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_never_exceeds_limit() {
        let gauge = Arc::new(Gauge {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let analyzer = Analyzer::from_shared(Arc::clone(&gauge), 2);

        let texts = (0..8).map(|i| format!("t{}", i)).collect();
        let results = analyzer.analyze_all(texts).await;

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.is_report()));
        let peak = gauge.peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak in-flight was {}", peak);
    }

    #[tokio::test]
    async fn test_progress_fires_once_per_item() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let analyzer = Analyzer::new(FailsOn("bad"), 3).with_progress(Arc::new(move |p: AnalysisProgress| {
            sink.lock().unwrap().push(p);
        }));

        analyzer
            .analyze_all(vec!["ok".into(), "bad".into(), "ok".into(), "ok".into()])
            .await;

        let mut seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|p| p.total == 4));

        let mut completed: Vec<usize> = seen.iter().map(|p| p.completed).collect();
        completed.sort_unstable();
        assert_eq!(completed, vec![1, 2, 3, 4]);

        seen.sort_by_key(|p| p.index);
        assert!(!seen[1].succeeded);
        assert!(seen[0].succeeded && seen[2].succeeded && seen[3].succeeded);
    }
}
