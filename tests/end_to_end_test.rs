//! End-to-end pipeline scenarios
//!
//! Every test runs the full orchestrator against a local git fixture and a
//! mock generation client, then asserts on the persisted project record.

mod support;

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use docforge::llm::{MockLLMClient, MockResponse};
use docforge::pipeline::{AnalysisPipeline, AnalysisRequest};
use docforge::store::{MemoryProjectStore, RunStatus};
use docforge::AnalysisConfig;

use support::{commit_all, express_fixture, fragment_response, write_file};

struct Harness {
    store: Arc<MemoryProjectStore>,
    llm: Arc<MockLLMClient>,
    pipeline: AnalysisPipeline,
    _scratch: TempDir,
    workspace_root: std::path::PathBuf,
}

fn harness(config: AnalysisConfig) -> Harness {
    let scratch = TempDir::new().unwrap();
    let workspace_root = scratch.path().join("workspaces");
    let store = Arc::new(MemoryProjectStore::new());
    let llm = Arc::new(MockLLMClient::new());
    let config = config
        .with_workspace_root(&workspace_root)
        .with_retry_backoff(Duration::from_millis(1));
    let pipeline = AnalysisPipeline::new(store.clone(), llm.clone(), config);
    Harness {
        store,
        llm,
        pipeline,
        _scratch: scratch,
        workspace_root,
    }
}

fn request(repo: &TempDir, project_id: &str) -> AnalysisRequest {
    AnalysisRequest {
        repository_url: repo.path().to_str().unwrap().to_string(),
        project_id: project_id.to_string(),
        display_name: "shop-api".to_string(),
    }
}

#[tokio::test]
async fn test_happy_path_produces_completed_documentation() {
    let repo = TempDir::new().unwrap();
    express_fixture(repo.path());

    let h = harness(AnalysisConfig::default());
    // Three eligible files fit in a single batch.
    h.llm
        .add_response(MockResponse::text(fragment_response("/users")));

    let status = h.pipeline.run(request(&repo, "p1")).await;
    assert_eq!(status, RunStatus::Completed);

    let record = h.store.snapshot("p1").unwrap();
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.progress, 100);
    assert_eq!(record.language.as_deref(), Some("JavaScript"));
    assert!(record
        .description
        .unwrap()
        .contains("Generated documentation for 1 endpoints"));

    let docs = h.store.documentation("p1");
    assert_eq!(docs.len(), 1, "documentation must be stored exactly once");
    assert_eq!(docs[0].version, "1.0.0");
    assert_eq!(docs[0].content["openapi"], "3.0.0");
    assert_eq!(docs[0].content["info"]["title"], "shop-api");
    assert!(docs[0].content["paths"]["/users"].is_object());

    assert!(
        !h.workspace_root.join("p1").exists(),
        "workspace must be removed after the run"
    );
}

#[tokio::test]
async fn test_happy_path_progress_is_non_decreasing() {
    let repo = TempDir::new().unwrap();
    express_fixture(repo.path());

    let h = harness(AnalysisConfig::default());
    h.llm
        .add_response(MockResponse::text(fragment_response("/users")));

    h.pipeline.run(request(&repo, "p1")).await;

    let progress: Vec<u8> = h
        .store
        .history("p1")
        .iter()
        .filter_map(|patch| patch.progress)
        .collect();

    assert!(!progress.is_empty());
    assert!(
        progress.windows(2).all(|w| w[0] <= w[1]),
        "progress must never decrease within a run: {:?}",
        progress
    );
    assert_eq!(*progress.last().unwrap(), 100);
}

#[tokio::test]
async fn test_empty_repository_fails_with_no_code_files() {
    let repo = TempDir::new().unwrap();
    write_file(repo.path(), "README.md", "# nothing to analyze");
    commit_all(repo.path());

    let h = harness(AnalysisConfig::default());

    let status = h.pipeline.run(request(&repo, "p1")).await;
    assert_eq!(status, RunStatus::Failed);

    let record = h.store.snapshot("p1").unwrap();
    assert_eq!(record.status, RunStatus::Failed);
    assert_eq!(record.progress, 0);
    assert!(record.description.unwrap().contains("no code files"));

    // The run failed at the collection phase; the workspace must be gone.
    assert!(!h.workspace_root.join("p1").exists());

    assert_eq!(h.llm.call_count(), 0, "no generation call without input");
}

#[tokio::test]
async fn test_all_batches_failing_yields_no_routes_error() {
    let repo = TempDir::new().unwrap();
    express_fixture(repo.path());

    // Empty mock queue: every generation attempt errors.
    let h = harness(AnalysisConfig::default());

    let status = h.pipeline.run(request(&repo, "p1")).await;
    assert_eq!(status, RunStatus::Failed);

    let record = h.store.snapshot("p1").unwrap();
    assert_eq!(record.progress, 0);
    assert!(record.description.unwrap().contains("no routes identified"));

    // One batch, three attempts each.
    assert_eq!(h.llm.call_count(), 3);
    assert!(!h.workspace_root.join("p1").exists());
}

#[tokio::test]
async fn test_failed_batch_is_dropped_but_run_continues() {
    let repo = TempDir::new().unwrap();
    // Ten eligible files with batch size 2 -> 5 batches.
    for i in 0..7 {
        write_file(repo.path(), &format!("src/extra{i}.js"), "const x = 1;");
    }
    express_fixture(repo.path());

    let h = harness(AnalysisConfig::default().with_batch_size(2).with_max_attempts(1));
    h.llm.add_responses(vec![
        MockResponse::text(fragment_response("/users")),
        MockResponse::text("this is not json"),
        MockResponse::text(fragment_response("/orders")),
        MockResponse::text(fragment_response("/items")),
        MockResponse::text(fragment_response("/carts")),
    ]);

    let status = h.pipeline.run(request(&repo, "p1")).await;
    assert_eq!(status, RunStatus::Completed);

    let docs = h.store.documentation("p1");
    let paths = docs[0].content["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 4, "the unparseable batch contributes nothing");
}

#[tokio::test]
async fn test_size_cap_bounds_generation_calls() {
    let repo = TempDir::new().unwrap();
    for i in 0..100 {
        write_file(repo.path(), &format!("src/file{i:03}.js"), "const x = 1;");
    }
    commit_all(repo.path());

    let h = harness(AnalysisConfig::default().with_max_files(30).with_batch_size(5));
    for i in 0..6 {
        h.llm
            .add_response(MockResponse::text(fragment_response(&format!("/r{i}"))));
    }

    let status = h.pipeline.run(request(&repo, "p1")).await;
    assert_eq!(status, RunStatus::Completed);

    assert_eq!(
        h.llm.call_count(),
        6,
        "100 eligible files with cap 30 must produce exactly 6 batches"
    );

    let docs = h.store.documentation("p1");
    assert_eq!(docs[0].content["paths"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn test_concurrent_runs_are_isolated() {
    let repo_a = TempDir::new().unwrap();
    express_fixture(repo_a.path());
    let repo_b = TempDir::new().unwrap();
    express_fixture(repo_b.path());

    let h = harness(AnalysisConfig::default());
    h.llm.add_responses(vec![
        MockResponse::text(fragment_response("/users")),
        MockResponse::text(fragment_response("/users")),
    ]);

    let pipeline = Arc::new(h.pipeline);
    let a = {
        let pipeline = Arc::clone(&pipeline);
        let request = request(&repo_a, "project-a");
        tokio::spawn(async move { pipeline.run(request).await })
    };
    let b = {
        let pipeline = Arc::clone(&pipeline);
        let request = request(&repo_b, "project-b");
        tokio::spawn(async move { pipeline.run(request).await })
    };

    assert_eq!(a.await.unwrap(), RunStatus::Completed);
    assert_eq!(b.await.unwrap(), RunStatus::Completed);

    assert_eq!(h.store.documentation("project-a").len(), 1);
    assert_eq!(h.store.documentation("project-b").len(), 1);
    assert!(!h.workspace_root.join("project-a").exists());
    assert!(!h.workspace_root.join("project-b").exists());
}
