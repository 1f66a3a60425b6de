//! CLI layer for theoryx.
//!
//! Provides the command-line interface using clap, with commands for
//! solving problems, converting formulas and inspecting model settings.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{ApiArgs, Cli, Commands};
