//! Analysis pipeline configuration
//!
//! All tunables for one analysis run live here and are injected into the
//! orchestrator at construction. There is no module-level state.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Parent directory for per-run clone workspaces
    pub workspace_root: PathBuf,
    /// Upper bound on the number of prioritized files sent for generation
    pub max_files: usize,
    /// Number of files per generation batch
    pub batch_size: usize,
    /// Files at or above this size are skipped during collection
    pub max_file_bytes: u64,
    /// Attempts per batch before it is abandoned
    pub max_attempts: u32,
    /// Fixed wait between failed attempts
    pub retry_backoff: Duration,
    /// Bound on the clone operation
    pub clone_timeout: Duration,
    /// Bound on a single generation request
    pub request_timeout: Duration,
    /// Sampling temperature for generation requests
    pub temperature: f32,
    /// Output token budget per generation request
    pub max_output_tokens: u32,
    /// Language for generated descriptions and summaries (BCP 47 tag)
    pub documentation_language: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::temp_dir().join("docforge"),
            max_files: 40,
            batch_size: 5,
            max_file_bytes: 100_000,
            max_attempts: 3,
            retry_backoff: Duration::from_secs(2),
            clone_timeout: Duration::from_secs(120),
            request_timeout: Duration::from_secs(60),
            temperature: 0.2,
            max_output_tokens: 8192,
            documentation_language: "en".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace_root(mut self, workspace_root: impl Into<PathBuf>) -> Self {
        self.workspace_root = workspace_root.into();
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_clone_timeout(mut self, clone_timeout: Duration) -> Self {
        self.clone_timeout = clone_timeout;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_documentation_language(mut self, language: impl Into<String>) -> Self {
        self.documentation_language = language.into();
        self
    }
}
