use clap::{Parser, Subcommand};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// LLM-powered OpenAPI documentation generator
#[derive(Parser, Debug)]
#[command(
    name = "docforge",
    about = "LLM-powered OpenAPI documentation generator for source repositories",
    version,
    long_about = "docforge clones a repository, selects its most relevant source files, \
                  sends them in batches to a generation backend (Gemini, OpenAI, Claude, \
                  Ollama, Groq) and merges the partial results into one OpenAPI document."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze a repository and generate OpenAPI documentation",
        long_about = "Clones the repository, analyzes its source files with the configured \
                      generation backend and writes the merged OpenAPI document.\n\n\
                      Examples:\n  \
                      docforge analyze https://github.com/example/shop-api.git\n  \
                      docforge analyze https://github.com/example/shop-api.git --name shop-api\n  \
                      docforge analyze https://github.com/example/shop-api.git --provider openai --model gpt-4o-mini"
    )]
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "URL", help = "Repository URL to clone and analyze")]
    pub repository_url: String,

    #[arg(
        short = 'n',
        long,
        value_name = "NAME",
        help = "Project display name (defaults to the last URL segment)"
    )]
    pub name: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_parser = parse_adapter_kind,
        default_value = "gemini",
        help = "Generation backend provider"
    )]
    pub provider: AdapterKind,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        default_value = "gemini-2.5-flash",
        help = "Model name to use (provider-specific)"
    )]
    pub model: String,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        default_value = "openapi.json",
        help = "Where to write the merged OpenAPI document"
    )]
    pub output: PathBuf,

    #[arg(
        long,
        value_name = "LANG",
        default_value = "en",
        help = "Language for generated descriptions and summaries"
    )]
    pub doc_language: String,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "60",
        help = "Per-request generation timeout in seconds"
    )]
    pub timeout: u64,
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    AdapterKind::from_lower_str(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "Invalid provider: {}. Valid options: ollama, openai, anthropic, gemini, xai, groq",
            s
        )
    })
}
