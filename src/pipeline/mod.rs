//! Repository analysis pipeline
//!
//! One run is a sequential chain: clone, collect, detect, batch, generate
//! with retries, merge, persist. Batches are processed one at a time; only
//! one batch's file contents plus the running merge live in memory at once.

pub mod batch;
pub mod collector;
pub mod detector;
pub mod extract;
pub mod fetcher;
pub mod generation;
pub mod merge;
pub mod orchestrator;
pub mod prompt;

pub use collector::{CollectedFile, FileCollector};
pub use detector::StackInfo;
pub use fetcher::{RepositoryFetcher, Workspace};
pub use generation::{BatchSkip, GenerationAdapter, SkipReason};
pub use merge::{OpenApiDocument, SpecFragment};
pub use orchestrator::{AnalysisError, AnalysisPipeline, AnalysisRequest, RunSummary};
