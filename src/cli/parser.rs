//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::config::{
    API_BASE_URL_VAR, API_KEY_VAR, COMPLEX_IMAGE_MODEL_VAR, COMPLEX_SOLVER_MODEL_VAR,
    SIMPLE_IMAGE_MODEL_VAR, SIMPLE_SOLVER_MODEL_VAR,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// theoryx: step-by-step theoretical mechanics solutions.
///
/// Describes the problem figure, streams a worked solution and converts
/// its LaTeX to markdown math.
#[derive(Parser, Debug)]
#[command(name = "theoryx")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Directory for the solver log file (console only if omitted).
    #[arg(long, env = "THEORYX_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Model API settings.
    #[command(flatten)]
    pub api: ApiArgs,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Model API settings, each falling back to its environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = API_BASE_URL_VAR, global = true)]
    pub api_base_url: Option<String>,

    /// API key.
    #[arg(long, env = API_KEY_VAR, global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Image model for simple mode.
    #[arg(long, env = SIMPLE_IMAGE_MODEL_VAR, global = true)]
    pub simple_image_model: Option<String>,

    /// Solver model for simple mode.
    #[arg(long, env = SIMPLE_SOLVER_MODEL_VAR, global = true)]
    pub simple_solver_model: Option<String>,

    /// Image model for complex mode.
    #[arg(long, env = COMPLEX_IMAGE_MODEL_VAR, global = true)]
    pub complex_image_model: Option<String>,

    /// Solver model for complex mode.
    #[arg(long, env = COMPLEX_SOLVER_MODEL_VAR, global = true)]
    pub complex_solver_model: Option<String>,
}

impl ApiArgs {
    /// Looks up a setting by its environment variable name.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            API_BASE_URL_VAR => self.api_base_url.clone(),
            API_KEY_VAR => self.api_key.clone(),
            SIMPLE_IMAGE_MODEL_VAR => self.simple_image_model.clone(),
            SIMPLE_SOLVER_MODEL_VAR => self.simple_solver_model.clone(),
            COMPLEX_IMAGE_MODEL_VAR => self.complex_image_model.clone(),
            COMPLEX_SOLVER_MODEL_VAR => self.complex_solver_model.clone(),
            _ => None,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a problem and stream the solution.
    Solve {
        /// Problem statement (reads --file or stdin if omitted).
        text: Option<String>,

        /// Read the problem statement from a file.
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Figure accompanying the problem.
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Use the complex-mode models.
        #[arg(short, long)]
        complex: bool,

        /// Save the solution as a zip archive into this directory.
        #[arg(short, long, num_args = 0..=1, default_missing_value = crate::archive::DEFAULT_OUTPUT_DIR)]
        save: Option<PathBuf>,

        /// Print the interaction log after the solution.
        #[arg(long)]
        show_log: bool,
    },

    /// Convert LaTeX math delimiters to markdown math.
    Convert {
        /// Input file (reads stdin if omitted).
        file: Option<PathBuf>,
    },

    /// Show the models selected for a mode.
    Models {
        /// Show the complex-mode models.
        #[arg(short, long)]
        complex: bool,
    },
}
