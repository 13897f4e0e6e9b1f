pub mod commands;
pub mod handlers;

pub use commands::{AnalyzeArgs, CliArgs, Commands};
pub use handlers::handle_analyze;
