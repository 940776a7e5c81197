//! eiam - ephemeral-iam configuration manager
//!
//! Command-line entry point for managing the ephemeral-iam configuration file.

use clap::Parser;
use eiam::cli::{run, Cli};
use eiam::logging::{LogFormat, LogLevel, LoggerHandle};
use tracing::error;

#[tokio::main]
async fn main() {
    // Initialize logging
    let mut logger = init_logging();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the command
    if let Err(e) = run(cli, &mut logger).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() -> LoggerHandle {
    LoggerHandle::init(LogLevel::Info, LogFormat::Text).unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        LoggerHandle::detached(LogLevel::Info, LogFormat::Text)
    })
}
