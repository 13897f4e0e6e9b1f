//! Batch generation with bounded retries
//!
//! Wraps the [`LLMClient`] with the per-batch retry/backoff policy. A batch
//! that exhausts its budget is abandoned, never escalated; partial
//! documentation is preferable to none.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::llm::{BackendError, GenerationRequest, LLMClient, ResponseFormat};

use super::extract::{parse_fragment, ParseError};
use super::merge::SpecFragment;

/// Why a single attempt failed
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Generation(#[from] BackendError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Record of an abandoned batch
#[derive(Debug)]
pub struct BatchSkip {
    pub batch_index: usize,
    pub attempts: u32,
    pub reason: SkipReason,
}

/// Sends rendered prompts to the generation service with bounded retries
pub struct GenerationAdapter {
    client: Arc<dyn LLMClient>,
    max_attempts: u32,
    backoff: Duration,
    temperature: f32,
    max_output_tokens: u32,
}

impl GenerationAdapter {
    pub fn new(client: Arc<dyn LLMClient>, config: &AnalysisConfig) -> Self {
        Self {
            client,
            max_attempts: config.max_attempts.max(1),
            backoff: config.retry_backoff,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    /// Runs one batch prompt through the service.
    ///
    /// A parse failure counts toward the retry budget exactly like a request
    /// failure. The returned skip carries the attempt count and last reason.
    pub async fn analyze_batch(
        &self,
        batch_index: usize,
        prompt: &str,
    ) -> Result<SpecFragment, BatchSkip> {
        let mut last_reason: Option<SkipReason> = None;

        for attempt in 1..=self.max_attempts {
            let request = GenerationRequest::new(prompt)
                .with_temperature(self.temperature)
                .with_max_tokens(self.max_output_tokens)
                .with_response_format(ResponseFormat::Json);

            let reason = match self.client.generate(request).await {
                Ok(response) => match parse_fragment(&response.content) {
                    Ok(fragment) => {
                        debug!(
                            batch = batch_index + 1,
                            attempt,
                            paths = fragment.paths.len(),
                            "Batch fragment parsed"
                        );
                        return Ok(fragment);
                    }
                    Err(err) => SkipReason::from(err),
                },
                Err(err) => SkipReason::from(err),
            };

            warn!(
                batch = batch_index + 1,
                attempt,
                max_attempts = self.max_attempts,
                reason = %reason,
                "Batch attempt failed"
            );
            last_reason = Some(reason);

            if attempt < self.max_attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        Err(BatchSkip {
            batch_index,
            attempts: self.max_attempts,
            reason: last_reason.unwrap_or(SkipReason::Generation(BackendError::Other {
                message: "no attempt was made".to_string(),
            })),
        })
    }
}
