//! Command handlers for the docforge CLI

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::llm::GenAIClient;
use crate::pipeline::{AnalysisPipeline, AnalysisRequest};
use crate::progress::LoggingHandler;
use crate::store::{MemoryProjectStore, RunStatus};

use super::commands::AnalyzeArgs;

/// Runs one analysis end to end and writes the merged document to disk.
///
/// Returns a process exit code.
pub async fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    match run_analysis(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("Analysis command failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

async fn run_analysis(args: &AnalyzeArgs) -> Result<i32> {
    let display_name = args
        .name
        .clone()
        .unwrap_or_else(|| display_name_from_url(&args.repository_url));
    let project_id = format!("project_{}", Uuid::new_v4());

    let llm = Arc::new(
        GenAIClient::new(
            args.provider,
            args.model.clone(),
            Duration::from_secs(args.timeout),
        )
        .context("Failed to create generation client")?,
    );

    let store = Arc::new(MemoryProjectStore::new());
    let config = AnalysisConfig::default()
        .with_request_timeout(Duration::from_secs(args.timeout))
        .with_documentation_language(args.doc_language.clone());

    let pipeline = AnalysisPipeline::new(store.clone(), llm, config)
        .with_progress_handler(Arc::new(LoggingHandler));

    let status = pipeline
        .run(AnalysisRequest {
            repository_url: args.repository_url.clone(),
            project_id: project_id.clone(),
            display_name: display_name.clone(),
        })
        .await;

    match status {
        RunStatus::Completed => {
            let documentation = store
                .documentation(&project_id)
                .into_iter()
                .next()
                .context("Run completed but no documentation was stored")?;

            let rendered = serde_json::to_string_pretty(&documentation.content)?;
            std::fs::write(&args.output, rendered)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;

            info!(
                project = %display_name,
                output = %args.output.display(),
                "Documentation written"
            );
            println!("Documentation written to {}", args.output.display());
            Ok(0)
        }
        _ => {
            let reason = store
                .snapshot(&project_id)
                .and_then(|record| record.description)
                .unwrap_or_else(|| "unknown failure".to_string());
            eprintln!("Analysis failed: {}", reason);
            Ok(1)
        }
    }
}

fn display_name_from_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
        .to_string()
}
