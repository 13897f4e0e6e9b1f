//! Progress handler trait and events

use std::time::Duration;

/// Events emitted as an analysis run advances
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started {
        project_id: String,
        repository_url: String,
    },

    /// Repository clone completed
    CloneComplete { duration: Duration },

    /// File collection completed
    FilesCollected { total: usize, prioritized: usize },

    /// Generation for a batch started
    BatchStarted { index: usize, total: usize },

    /// Generation for a batch completed and its fragment was parsed
    BatchComplete {
        index: usize,
        total: usize,
        duration: Duration,
    },

    /// A batch exhausted its retry budget and was dropped
    BatchSkipped {
        index: usize,
        total: usize,
        attempts: u32,
        reason: String,
    },

    /// Fragments merged into one document
    MergeComplete { routes: usize, schemas: usize },

    /// Run completed successfully
    Completed {
        routes: usize,
        total_time: Duration,
    },

    /// Run failed
    Failed { error: String },
}

/// Trait for handling progress events during an analysis run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {
        // Intentionally empty
    }
}
