//! Repository acquisition
//!
//! Clones a remote repository into a per-run workspace directory. The
//! [`Workspace`] guard removes the directory when dropped, so cleanup runs on
//! every exit path of a run, including early errors and unwinds.

use std::path::{Path, PathBuf};
use std::time::Duration;

use git2::build::RepoBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("git clone failed: {0}")]
    Clone(#[from] git2::Error),
    #[error("io error preparing workspace: {0}")]
    Io(#[from] std::io::Error),
    #[error("clone timed out after {0} seconds")]
    Timeout(u64),
    #[error("clone task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Scratch directory holding one run's cloned repository
///
/// Exclusively owned by a single run; the directory is removed on drop.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(err) = std::fs::remove_dir_all(&self.path) {
                warn!(path = %self.path.display(), error = %err, "Failed to remove workspace");
            } else {
                debug!(path = %self.path.display(), "Removed workspace");
            }
        }
    }
}

/// Clones repositories into per-project workspace directories
#[derive(Debug, Clone)]
pub struct RepositoryFetcher {
    workspace_root: PathBuf,
    clone_timeout: Duration,
}

impl RepositoryFetcher {
    pub fn new(workspace_root: PathBuf, clone_timeout: Duration) -> Self {
        Self {
            workspace_root,
            clone_timeout,
        }
    }

    /// Clone `repository_url` into a workspace keyed by `project_id`.
    ///
    /// Any pre-existing content at the workspace path is removed first. Clone
    /// failures are not retried; they are rarely transient within the window
    /// a run has available.
    pub async fn fetch(
        &self,
        project_id: &str,
        repository_url: &str,
    ) -> Result<Workspace, FetchError> {
        let path = self.workspace_root.join(project_id);
        if path.exists() {
            std::fs::remove_dir_all(&path)?;
        }
        std::fs::create_dir_all(&self.workspace_root)?;

        // Guard created before the clone so a failed clone still cleans up
        // whatever git2 left behind.
        let workspace = Workspace::new(path.clone());

        info!(project = %project_id, repository = %repository_url, "Starting clone");

        let url = repository_url.to_string();
        let clone_task =
            tokio::task::spawn_blocking(move || RepoBuilder::new().clone(&url, &path));

        match tokio::time::timeout(self.clone_timeout, clone_task).await {
            Ok(join_result) => {
                join_result??;
            }
            Err(_) => {
                return Err(FetchError::Timeout(self.clone_timeout.as_secs()));
            }
        }

        debug!(project = %project_id, path = %workspace.path().display(), "Clone complete");

        Ok(workspace)
    }
}
