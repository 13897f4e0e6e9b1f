//! docforge - LLM-powered OpenAPI documentation generator
//!
//! This library clones a source repository, selects and prioritizes its
//! source files, sends them in bounded batches to a text generation service,
//! and merges the partial results into a single OpenAPI document persisted
//! against the owning project record.
//!
//! # Core Concepts
//!
//! - **Pipeline**: one analysis run is a sequential chain of clone, file
//!   collection, batching, generation with retries, and merging
//! - **Fragments**: each batch yields a partial `paths`/`components.schemas`
//!   object; failed batches are dropped, never merged
//! - **Project store**: the narrow boundary through which status, progress
//!   and the final document are persisted
//!
//! # Example Usage
//!
//! ```ignore
//! use docforge::{
//!     AnalysisConfig, AnalysisPipeline, AnalysisRequest, GenAIClient, MemoryProjectStore,
//! };
//! use genai::adapter::AdapterKind;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn analyze() {
//!     let store = Arc::new(MemoryProjectStore::new());
//!     let llm = Arc::new(
//!         GenAIClient::new(
//!             AdapterKind::Gemini,
//!             "gemini-2.5-flash".to_string(),
//!             Duration::from_secs(60),
//!         )
//!         .unwrap(),
//!     );
//!     let pipeline = AnalysisPipeline::new(store, llm, AnalysisConfig::default());
//!
//!     pipeline
//!         .run(AnalysisRequest {
//!             repository_url: "https://github.com/example/shop-api.git".to_string(),
//!             project_id: "shop-api-1".to_string(),
//!             display_name: "shop-api".to_string(),
//!         })
//!         .await;
//! }
//! ```

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod queue;
pub mod store;

pub use config::AnalysisConfig;
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient};
pub use pipeline::{
    AnalysisError, AnalysisPipeline, AnalysisRequest, OpenApiDocument, RunSummary, SpecFragment,
};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use queue::{spawn_analysis_workers, AnalysisQueueHandle};
pub use store::{MemoryProjectStore, ProjectPatch, ProjectStore, RunStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
