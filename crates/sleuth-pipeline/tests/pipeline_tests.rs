//! End-to-end tests for the fetch, analyze and record stages

use sleuth_domain::traits::Oracle;
use sleuth_domain::{AnalysisResult, FetchResult, SourceRef};
use sleuth_llm::MockProvider;
use sleuth_pipeline::{Analyzer, Fetcher, Pipeline, PipelineConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SERVED_JS: &str = "var api_key = 'served-key-0001';\n";

/// Minimal HTTP responder: `/ok.js` answers 200 with a script, anything
/// else answers 404
async fn spawn_responder() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let target = request.split_whitespace().nth(1).unwrap_or("/");
                let path = target.split('?').next().unwrap_or(target);

                let response = if path == "/ok.js" {
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/javascript\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        SERVED_JS.len(),
                        SERVED_JS
                    )
                } else {
                    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Responder that accepts connections and never answers
async fn spawn_silent_responder() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

fn write_js(dir: &Path, name: &str, content: &str) -> SourceRef {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    SourceRef::new(path.to_string_lossy())
}

/// The code block of an analysis prompt, trimmed
fn code_of(prompt: &str) -> &str {
    prompt.rsplit("---\n").nth(1).unwrap_or("").trim()
}

#[tokio::test]
async fn test_fetcher_local_and_404() {
    let addr = spawn_responder().await;
    let dir = TempDir::new().unwrap();
    let local = write_js(dir.path(), "a.js", r#"const k = "token: abc12345""#);
    let remote = SourceRef::new(format!("http://{}/y.js", addr));

    let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
    let outcomes = fetcher.fetch_all(&[local.clone(), remote.clone()]).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].source, local);
    assert_eq!(
        outcomes[0].result,
        FetchResult::Content(r#"const k = "token: abc12345""#.to_string())
    );
    assert_eq!(outcomes[1].source, remote);
    assert_eq!(outcomes[1].result, FetchResult::Error("HTTP 404".to_string()));
}

#[tokio::test]
async fn test_hung_remote_times_out_without_blocking_siblings() {
    let addr = spawn_silent_responder().await;
    let dir = TempDir::new().unwrap();
    let hung = SourceRef::new(format!("http://{}/slow.js", addr));
    let local = write_js(dir.path(), "a.js", "x");

    let fetcher = Fetcher::new(Duration::from_millis(300)).unwrap();
    let started = Instant::now();
    let outcomes = fetcher.fetch_all(&[hung.clone(), local.clone()]).await;
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(3), "fetch_all took {:?}", elapsed);
    assert_eq!(outcomes[0].source, hung);
    match &outcomes[0].result {
        FetchResult::Error(reason) => assert!(reason.contains("timed out"), "{}", reason),
        other => panic!("Expected fetch error, got {:?}", other),
    }
    assert_eq!(outcomes[1].source, local);
    assert_eq!(outcomes[1].result, FetchResult::Content("x".to_string()));
}

#[tokio::test]
async fn test_remote_content_is_fetched() {
    let addr = spawn_responder().await;
    let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();

    let content = fetcher
        .fetch(&SourceRef::new(format!("http://{}/ok.js", addr)))
        .await
        .unwrap();
    assert_eq!(content, SERVED_JS);
}

#[tokio::test]
async fn test_run_with_local_file_and_missing_remote() {
    let addr = spawn_responder().await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("output");
    let local = write_js(dir.path(), "a.js", r#"const k = "token: abc12345""#);
    let remote = SourceRef::new(format!("http://{}/y.js", addr));

    let llm = MockProvider::new("No issues.");
    let config = PipelineConfig {
        output_dir: out.clone(),
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(config, llm.clone()).unwrap();
    let report = pipeline.run(vec![local.clone(), remote.clone()]).await.unwrap();

    assert_eq!(llm.call_count(), 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].source, local);
    assert!(report.records[0].findings.tokens.contains("abc12345"));

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].source, remote);
    assert_eq!(report.skipped[0].reason, "HTTP 404");

    let written = std::fs::read_to_string(out.join("a.md")).unwrap();
    assert!(written.contains("## Extracted Tokens:\nabc12345\n"));
    assert!(!out.join("y.md").exists());
}

#[tokio::test]
async fn test_run_with_remote_source_names_record_after_url() {
    let addr = spawn_responder().await;
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        output_dir: dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };

    let pipeline = Pipeline::new(config, MockProvider::new("ok")).unwrap();
    let report = pipeline
        .run(vec![SourceRef::new(format!("http://{}/ok.js?v=2", addr))])
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].id, "ok");
    assert!(report.records[0].findings.tokens.contains("served-key-0001"));
    assert!(dir.path().join("ok.md").exists());
}

/// Fails on odd-numbered items
struct OddFails;

impl Oracle for OddFails {
    type Error = String;

    fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
        let index: usize = code_of(prompt)
            .trim_start_matches("item")
            .parse()
            .map_err(|_| "unexpected prompt".to_string())?;
        if index % 2 == 1 {
            Err(format!("item {} rejected", index))
        } else {
            Ok(format!("report {}", index))
        }
    }
}

#[tokio::test]
async fn test_failures_land_in_their_own_slots() {
    let analyzer = Analyzer::new(OddFails, 3);
    let texts = (0..4).map(|i| format!("item{}", i)).collect();

    let results = analyzer.analyze_all(texts).await;

    assert_eq!(
        results,
        vec![
            AnalysisResult::Report("report 0".to_string()),
            AnalysisResult::Error("Oracle failed: item 1 rejected".to_string()),
            AnalysisResult::Report("report 2".to_string()),
            AnalysisResult::Error("Oracle failed: item 3 rejected".to_string()),
        ]
    );
}

/// Echoes its input after an uneven delay
struct Jittery;

impl Oracle for Jittery {
    type Error = String;

    fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
        let code = code_of(prompt);
        let seed: u64 = code.bytes().map(u64::from).sum();
        thread::sleep(Duration::from_millis((seed * 7919) % 23));
        Ok(code.to_string())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_order_is_preserved_for_every_limit() {
    for limit in 1..=10 {
        let analyzer = Analyzer::new(Jittery, limit);
        let texts: Vec<String> = (0..12).map(|i| format!("item{}", i)).collect();

        let results = analyzer.analyze_all(texts.clone()).await;

        let expected: Vec<AnalysisResult> = texts.into_iter().map(AnalysisResult::Report).collect();
        assert_eq!(results, expected, "order broken with limit {}", limit);
    }
}
