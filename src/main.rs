//! Binary entry point for theoryx.
//!
//! theoryx: step-by-step theoretical mechanics solutions.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use theoryx_rs::cli::output::{OutputFormat, format_error};
use theoryx_rs::cli::{Cli, execute};
use theoryx_rs::logging::{LoggingConfig, init_logging, level_for};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from .env become visible to clap's `env` fallbacks.
    let _ = dotenvy::dotenv_override();
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);

    let _log_guard = init_logging(&LoggingConfig {
        level: level_for(cli.verbose),
        log_dir: cli.log_dir.clone(),
        ..LoggingConfig::default()
    });

    let mut stdout = io::stdout();
    match execute(&cli, &mut stdout).await {
        Ok(output) => {
            if !output.is_empty() {
                // Handle broken pipe gracefully (e.g., when piped to `head` or `jq`)
                if let Err(e) = write!(stdout, "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json => {
                    // JSON errors go to stdout for programmatic parsing
                    print!("{error_output}");
                }
                OutputFormat::Text => {
                    eprintln!("Error: {error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
