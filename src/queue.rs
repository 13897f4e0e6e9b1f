//! Background execution of analysis runs
//!
//! Runs are fire-and-forget relative to their trigger: the caller submits an
//! [`AnalysisRequest`] and returns immediately. A worker pool drains the
//! queue, bounding how many projects analyze concurrently. Each run carries
//! its own error boundary inside [`AnalysisPipeline::run`], so a failed run
//! never takes the pool down.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info};

use crate::pipeline::{AnalysisPipeline, AnalysisRequest};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("analysis queue is closed")]
    Closed,
}

/// Handle for submitting analysis jobs to the background worker pool
#[derive(Clone)]
pub struct AnalysisQueueHandle {
    sender: mpsc::UnboundedSender<AnalysisRequest>,
}

impl AnalysisQueueHandle {
    pub fn submit(&self, request: AnalysisRequest) -> Result<(), QueueError> {
        self.sender.send(request).map_err(|_| QueueError::Closed)
    }
}

/// Spawns the worker pool and returns a submission handle.
///
/// At most `max_concurrent_runs` runs execute at once; each owns an
/// independent workspace keyed by its project identifier, so concurrent runs
/// share no mutable state beyond the project store.
pub fn spawn_analysis_workers(
    pipeline: Arc<AnalysisPipeline>,
    max_concurrent_runs: usize,
) -> AnalysisQueueHandle {
    let concurrency = max_concurrent_runs.max(1);
    let (sender, mut receiver) = mpsc::unbounded_channel::<AnalysisRequest>();
    let semaphore = Arc::new(Semaphore::new(concurrency));

    tokio::spawn(async move {
        info!(concurrency, "Analysis worker pool started");

        while let Some(request) = receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    error!(error = %err, "Failed to acquire worker permit");
                    break;
                }
            };

            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let _permit = permit;
                pipeline.run(request).await;
            });
        }

        info!("Analysis worker pool drained");
    });

    AnalysisQueueHandle { sender }
}
