//! protoforge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid configuration or arguments
//! - 3: Run finished with a fatal error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_CONFIG: u8 = 2;
    pub const RUN_FAILED: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("proto=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Design(args) => commands::design::execute(args).await,
        Commands::List(args) => commands::list::execute(args).await,
        Commands::Serve(args) => commands::serve::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let msg = e.to_string().to_lowercase();

    if msg.contains("configuration") || msg.contains("api key") || msg.contains("argument") {
        ExitCodes::INVALID_CONFIG
    } else if msg.contains("run failed") || msg.contains("publishing") {
        ExitCodes::RUN_FAILED
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
