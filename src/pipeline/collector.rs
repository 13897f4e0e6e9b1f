//! Source file collection
//!
//! Walks a cloned repository, keeping files that look like analyzable source
//! code and ranking likely route/controller files ahead of everything else.

use std::path::{Path, PathBuf};

use ignore::{overrides::OverrideBuilder, WalkBuilder};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory names never descended into
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "coverage",
    ".idea",
    ".vscode",
    "__pycache__",
    "venv",
    ".env",
];

/// Extensions considered analyzable source
const SOURCE_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "json", "py"];

/// File-name fragments marking likely route/controller/entrypoint files
const PRIORITY_MARKERS: &[&str] = &["route", "controller", "api"];

/// Known framework entrypoint file names
const ENTRYPOINT_NAMES: &[&str] = &["main.py", "app.py"];

/// Rank for likely route/controller files; these are analyzed first
pub const PRIORITY_ROUTE: u8 = 1;
/// Rank for all other eligible files
pub const PRIORITY_OTHER: u8 = 2;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("workspace path not found: {0}")]
    PathNotFound(PathBuf),
    #[error("workspace path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A source file retained for analysis
#[derive(Debug, Clone)]
pub struct CollectedFile {
    pub absolute_path: PathBuf,
    pub relative_path: String,
    pub content: String,
    pub priority: u8,
}

/// Collects and prioritizes source files from a workspace
#[derive(Debug, Clone)]
pub struct FileCollector {
    max_file_bytes: u64,
}

impl FileCollector {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    /// Walks `root` and returns eligible files ordered by priority rank,
    /// stable within a rank.
    ///
    /// An unreadable file is skipped with a warning; it never aborts the
    /// collection. The caller decides whether an empty result is fatal.
    pub fn collect(&self, root: &Path) -> Result<Vec<CollectedFile>, CollectError> {
        if !root.exists() {
            return Err(CollectError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(CollectError::NotADirectory(root.to_path_buf()));
        }

        let mut override_builder = OverrideBuilder::new(root);
        for excluded in EXCLUDED_DIRS {
            override_builder.add(&format!("!{}/", excluded)).ok();
        }
        let overrides = override_builder
            .build()
            .unwrap_or_else(|_| OverrideBuilder::new(root).build().unwrap());

        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .overrides(overrides)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };

            if !has_source_extension(file_name) || is_lock_file(file_name) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() >= self.max_file_bytes => {
                    debug!(
                        path = %path.display(),
                        size = meta.len(),
                        "Skipping oversized file"
                    );
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to stat file, skipping");
                    continue;
                }
            }

            // Non-UTF-8 content fails here and is treated like any other
            // unreadable file.
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to read file, skipping");
                    continue;
                }
            };

            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            files.push(CollectedFile {
                absolute_path: path.to_path_buf(),
                relative_path,
                content,
                priority: priority_rank(file_name),
            });
        }

        // Stable sort keeps traversal order within each rank.
        files.sort_by_key(|f| f.priority);

        info!(
            total = files.len(),
            prioritized = files.iter().filter(|f| f.priority == PRIORITY_ROUTE).count(),
            "Collected source files"
        );

        Ok(files)
    }
}

fn has_source_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_lock_file(file_name: &str) -> bool {
    file_name.contains("lock")
}

fn priority_rank(file_name: &str) -> u8 {
    let lowered = file_name.to_lowercase();
    if PRIORITY_MARKERS.iter().any(|m| lowered.contains(m))
        || ENTRYPOINT_NAMES.contains(&lowered.as_str())
    {
        PRIORITY_ROUTE
    } else {
        PRIORITY_OTHER
    }
}
