//! Analysis run orchestration
//!
//! Sequences clone, collection, batching, generation, merge and persistence
//! for one run, and owns the single error boundary: fatal errors become a
//! `failed` project record with a truncated reason, never a propagated error.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::AnalysisConfig;
use crate::llm::LLMClient;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::store::{ProjectPatch, ProjectStore, RunStatus, StoreError};

use super::batch::plan_batches;
use super::collector::{CollectError, FileCollector, PRIORITY_ROUTE};
use super::detector::detect_stack;
use super::fetcher::{FetchError, RepositoryFetcher};
use super::generation::GenerationAdapter;
use super::merge::{merge_fragments, DOCUMENT_VERSION};
use super::prompt::build_batch_prompt;

/// Upper bound on the failure reason persisted to the project record
const MAX_ERROR_DESCRIPTION: usize = 200;

/// Immutable description of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub repository_url: String,
    pub project_id: String,
    pub display_name: String,
}

/// Fatal-to-run errors caught at the orchestrator boundary
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error("no code files found in repository")]
    NoSourceFiles,
    #[error("no routes identified in the analyzed files")]
    NoRoutes,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize merged document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub routes: usize,
    pub schemas: usize,
    pub batches: usize,
    pub skipped_batches: usize,
}

/// Runs the repository analysis pipeline for one project at a time
pub struct AnalysisPipeline {
    store: Arc<dyn ProjectStore>,
    llm: Arc<dyn LLMClient>,
    config: AnalysisConfig,
    progress: Arc<dyn ProgressHandler>,
}

impl AnalysisPipeline {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        llm: Arc<dyn LLMClient>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            store,
            llm,
            config,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress_handler(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    /// Executes one run to a terminal status.
    ///
    /// Never returns an error: every fatal condition is recorded on the
    /// project record as `failed` with a bounded reason string, and the
    /// workspace is removed on all exit paths.
    pub async fn run(&self, request: AnalysisRequest) -> RunStatus {
        let start = Instant::now();

        self.progress.on_progress(&ProgressEvent::Started {
            project_id: request.project_id.clone(),
            repository_url: request.repository_url.clone(),
        });
        info!(
            project = %request.project_id,
            repository = %request.repository_url,
            "Starting repository analysis"
        );

        match self.execute(&request).await {
            Ok(summary) => {
                self.progress.on_progress(&ProgressEvent::Completed {
                    routes: summary.routes,
                    total_time: start.elapsed(),
                });
                info!(
                    project = %request.project_id,
                    routes = summary.routes,
                    batches = summary.batches,
                    skipped = summary.skipped_batches,
                    total_time_ms = start.elapsed().as_millis(),
                    "Analysis completed"
                );
                RunStatus::Completed
            }
            Err(err) => {
                error!(project = %request.project_id, error = %err, "Analysis failed");
                self.progress.on_progress(&ProgressEvent::Failed {
                    error: err.to_string(),
                });

                let description = truncate_reason(&err.to_string());
                let patch = ProjectPatch::new()
                    .with_status(RunStatus::Failed)
                    .with_progress(0)
                    .with_description(format!("Error: {}", description));
                if let Err(store_err) = self.store.update(&request.project_id, patch).await {
                    error!(
                        project = %request.project_id,
                        error = %store_err,
                        "Failed to record run failure"
                    );
                }
                RunStatus::Failed
            }
        }
    }

    async fn execute(&self, request: &AnalysisRequest) -> Result<RunSummary, AnalysisError> {
        self.update(
            &request.project_id,
            ProjectPatch::new()
                .with_status(RunStatus::Processing)
                .with_progress(10)
                .with_description("Cloning repository..."),
        )
        .await?;

        let fetcher = RepositoryFetcher::new(
            self.config.workspace_root.clone(),
            self.config.clone_timeout,
        );
        let clone_start = Instant::now();
        // The workspace guard lives for the rest of this function; its drop
        // removes the directory on success and on every early return.
        let workspace = fetcher
            .fetch(&request.project_id, &request.repository_url)
            .await?;
        self.progress.on_progress(&ProgressEvent::CloneComplete {
            duration: clone_start.elapsed(),
        });

        self.update(
            &request.project_id,
            ProjectPatch::new()
                .with_progress(20)
                .with_description("Reading source files..."),
        )
        .await?;

        let collector = FileCollector::new(self.config.max_file_bytes);
        let files = collector.collect(workspace.path())?;
        if files.is_empty() {
            return Err(AnalysisError::NoSourceFiles);
        }

        self.progress.on_progress(&ProgressEvent::FilesCollected {
            total: files.len(),
            prioritized: files.iter().filter(|f| f.priority == PRIORITY_ROUTE).count(),
        });

        let stack = detect_stack(&files);

        let batches = plan_batches(files, self.config.max_files, self.config.batch_size);
        let total_batches = batches.len();
        let adapter = GenerationAdapter::new(Arc::clone(&self.llm), &self.config);

        let mut fragments = Vec::new();
        let mut skipped_batches = 0;

        for (index, batch) in batches.iter().enumerate() {
            let percent = (30 + index * 50 / total_batches) as u8;
            self.update(
                &request.project_id,
                ProjectPatch::new().with_progress(percent).with_description(
                    format!(
                        "Analyzing batch {}/{} ({})...",
                        index + 1,
                        total_batches,
                        stack.framework
                    ),
                ),
            )
            .await?;

            self.progress.on_progress(&ProgressEvent::BatchStarted {
                index,
                total: total_batches,
            });

            let prompt = build_batch_prompt(
                &request.display_name,
                &stack,
                &self.config.documentation_language,
                batch,
            );

            let batch_start = Instant::now();
            match adapter.analyze_batch(index, &prompt).await {
                Ok(fragment) => {
                    self.progress.on_progress(&ProgressEvent::BatchComplete {
                        index,
                        total: total_batches,
                        duration: batch_start.elapsed(),
                    });
                    fragments.push(fragment);
                }
                Err(skip) => {
                    warn!(
                        project = %request.project_id,
                        batch = skip.batch_index + 1,
                        attempts = skip.attempts,
                        reason = %skip.reason,
                        "Dropping batch after exhausted retries"
                    );
                    self.progress.on_progress(&ProgressEvent::BatchSkipped {
                        index,
                        total: total_batches,
                        attempts: skip.attempts,
                        reason: skip.reason.to_string(),
                    });
                    skipped_batches += 1;
                }
            }
        }

        self.update(
            &request.project_id,
            ProjectPatch::new()
                .with_progress(85)
                .with_description("Merging partial documents..."),
        )
        .await?;

        let document = merge_fragments(&request.display_name, &fragments);
        if document.route_count() == 0 {
            return Err(AnalysisError::NoRoutes);
        }

        self.progress.on_progress(&ProgressEvent::MergeComplete {
            routes: document.route_count(),
            schemas: document.schema_count(),
        });

        let summary = RunSummary {
            routes: document.route_count(),
            schemas: document.schema_count(),
            batches: total_batches,
            skipped_batches,
        };

        let content = serde_json::to_value(&document)?;
        self.store
            .create_documentation(&request.project_id, content, DOCUMENT_VERSION)
            .await?;

        self.update(
            &request.project_id,
            ProjectPatch::new()
                .with_status(RunStatus::Completed)
                .with_progress(100)
                .with_language(stack.language.clone())
                .with_description(format!(
                    "Generated documentation for {} endpoints.",
                    summary.routes
                )),
        )
        .await?;

        Ok(summary)
    }

    async fn update(&self, project_id: &str, patch: ProjectPatch) -> Result<(), StoreError> {
        self.store.update(project_id, patch).await
    }
}

fn truncate_reason(message: &str) -> String {
    message.chars().take(MAX_ERROR_DESCRIPTION).collect()
}
