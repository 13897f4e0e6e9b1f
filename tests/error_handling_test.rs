//! Error boundary integration tests
//!
//! Covers the fatal-to-run taxonomy: clone failures, bounded failure
//! descriptions, and recovery from transient generation errors.

mod support;

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use docforge::llm::{BackendError, MockLLMClient, MockResponse};
use docforge::pipeline::{AnalysisPipeline, AnalysisRequest};
use docforge::store::{MemoryProjectStore, RunStatus};
use docforge::AnalysisConfig;

use support::{express_fixture, fragment_response};

fn pipeline_with(
    workspace_root: &std::path::Path,
) -> (Arc<MemoryProjectStore>, Arc<MockLLMClient>, AnalysisPipeline) {
    let store = Arc::new(MemoryProjectStore::new());
    let llm = Arc::new(MockLLMClient::new());
    let config = AnalysisConfig::default()
        .with_workspace_root(workspace_root)
        .with_retry_backoff(Duration::from_millis(1));
    let pipeline = AnalysisPipeline::new(store.clone(), llm.clone(), config);
    (store, llm, pipeline)
}

#[tokio::test]
async fn test_clone_failure_marks_run_failed() {
    let scratch = TempDir::new().unwrap();
    let (store, llm, pipeline) = pipeline_with(scratch.path());

    let status = pipeline
        .run(AnalysisRequest {
            repository_url: "/nonexistent/not-a-repo".to_string(),
            project_id: "p1".to_string(),
            display_name: "broken".to_string(),
        })
        .await;

    assert_eq!(status, RunStatus::Failed);

    let record = store.snapshot("p1").unwrap();
    assert_eq!(record.status, RunStatus::Failed);
    assert_eq!(record.progress, 0);

    let description = record.description.unwrap();
    assert!(description.starts_with("Error: "));
    assert!(description.contains("git clone failed"));

    // Clone failures never consume the retry budget.
    assert_eq!(llm.call_count(), 0);
    assert!(!scratch.path().join("p1").exists());
}

#[tokio::test]
async fn test_failure_description_is_bounded() {
    let scratch = TempDir::new().unwrap();
    let (store, _llm, pipeline) = pipeline_with(scratch.path());

    // A long bogus path drags the clone error message past the bound.
    let long_segment = "a".repeat(300);
    pipeline
        .run(AnalysisRequest {
            repository_url: format!("/nonexistent/{}", long_segment),
            project_id: "p1".to_string(),
            display_name: "broken".to_string(),
        })
        .await;

    let description = store.snapshot("p1").unwrap().description.unwrap();
    // "Error: " prefix plus at most 200 characters of reason.
    assert!(description.chars().count() <= 207);
}

#[tokio::test]
async fn test_transient_generation_errors_recover_within_budget() {
    let repo = TempDir::new().unwrap();
    express_fixture(repo.path());

    let scratch = TempDir::new().unwrap();
    let (store, llm, pipeline) = pipeline_with(scratch.path());
    llm.add_responses(vec![
        MockResponse::error(BackendError::RateLimitError {
            retry_after: Some(1),
        }),
        MockResponse::text("not json"),
        MockResponse::text(fragment_response("/users")),
    ]);

    let status = pipeline
        .run(AnalysisRequest {
            repository_url: repo.path().to_str().unwrap().to_string(),
            project_id: "p1".to_string(),
            display_name: "shop-api".to_string(),
        })
        .await;

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(llm.call_count(), 3, "two failures then success, one batch");
    assert_eq!(store.snapshot("p1").unwrap().progress, 100);
}

#[tokio::test]
async fn test_terminal_status_is_not_overwritten_by_later_phases() {
    let scratch = TempDir::new().unwrap();
    let (store, _llm, pipeline) = pipeline_with(scratch.path());

    pipeline
        .run(AnalysisRequest {
            repository_url: "/nonexistent/not-a-repo".to_string(),
            project_id: "p1".to_string(),
            display_name: "broken".to_string(),
        })
        .await;

    // The failed patch is the last one recorded; nothing runs after it.
    let history = store.history("p1");
    let last = history.last().unwrap();
    assert_eq!(last.status, Some(RunStatus::Failed));
}
