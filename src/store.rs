//! Project record persistence boundary
//!
//! The pipeline never touches the owning application's storage directly; it
//! requests updates through [`ProjectStore`]. Implementations must support
//! concurrent independent writes keyed by project identifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Lifecycle state of one analysis run
///
/// Transitions are monotonic: a run never returns to `Pending` or
/// `Processing` once it reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Partial update applied to a project record
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub status: Option<RunStatus>,
    pub progress: Option<u8>,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store rejected update for project {project_id}: {message}")]
    UpdateRejected {
        project_id: String,
        message: String,
    },
}

/// Narrow interface to the owning application's project records
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Applies a partial update to the project record. Called many times per
    /// run; the latest values win.
    async fn update(&self, project_id: &str, patch: ProjectPatch) -> Result<(), StoreError>;

    /// Stores the generated documentation for the project. Called exactly
    /// once per successful run.
    async fn create_documentation(
        &self,
        project_id: &str,
        content: serde_json::Value,
        version: &str,
    ) -> Result<(), StoreError>;
}

/// Current view of one project record
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub status: RunStatus,
    pub progress: u8,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl Default for ProjectRecord {
    fn default() -> Self {
        Self {
            status: RunStatus::Pending,
            progress: 0,
            description: None,
            language: None,
        }
    }
}

/// A stored documentation artifact
#[derive(Debug, Clone)]
pub struct StoredDocumentation {
    pub content: serde_json::Value,
    pub version: String,
}

#[derive(Debug, Default)]
struct ProjectState {
    record: ProjectRecord,
    history: Vec<ProjectPatch>,
    documentation: Vec<StoredDocumentation>,
}

/// In-memory [`ProjectStore`] used by the CLI and by tests
///
/// Records every patch in arrival order so tests can assert on progress
/// monotonicity and status transitions.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: RwLock<HashMap<String, ProjectState>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current record for a project, if any update touched it
    pub fn snapshot(&self, project_id: &str) -> Option<ProjectRecord> {
        self.projects
            .read()
            .unwrap()
            .get(project_id)
            .map(|state| state.record.clone())
    }

    /// Returns every patch applied to a project, in arrival order
    pub fn history(&self, project_id: &str) -> Vec<ProjectPatch> {
        self.projects
            .read()
            .unwrap()
            .get(project_id)
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }

    /// Returns all documentation stored for a project
    pub fn documentation(&self, project_id: &str) -> Vec<StoredDocumentation> {
        self.projects
            .read()
            .unwrap()
            .get(project_id)
            .map(|state| state.documentation.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn update(&self, project_id: &str, patch: ProjectPatch) -> Result<(), StoreError> {
        let mut projects = self.projects.write().unwrap();
        let state = projects.entry(project_id.to_string()).or_default();

        if let Some(status) = patch.status {
            state.record.status = status;
        }
        if let Some(progress) = patch.progress {
            state.record.progress = progress;
        }
        if let Some(ref description) = patch.description {
            state.record.description = Some(description.clone());
        }
        if let Some(ref language) = patch.language {
            state.record.language = Some(language.clone());
        }
        state.history.push(patch);
        Ok(())
    }

    async fn create_documentation(
        &self,
        project_id: &str,
        content: serde_json::Value,
        version: &str,
    ) -> Result<(), StoreError> {
        let mut projects = self.projects.write().unwrap();
        let state = projects.entry(project_id.to_string()).or_default();
        state.documentation.push(StoredDocumentation {
            content,
            version: version.to_string(),
        });
        Ok(())
    }
}
