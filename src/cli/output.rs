//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::archive::SavedArchive;
use crate::config::ModelPair;
use crate::solver::SolveUpdate;
use serde::Serialize;
use std::fmt::Write as FmtWrite;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Writes a growing document to a terminal.
///
/// Documents usually only grow, so only the new suffix is written. When an
/// update rewrites earlier text the whole document is written again.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    printed: String,
}

impl ProgressPrinter {
    /// Creates a printer that has written nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes whatever part of `document` is not on screen yet.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn update<W: Write>(&mut self, out: &mut W, document: &str) -> io::Result<()> {
        if let Some(suffix) = document.strip_prefix(self.printed.as_str()) {
            out.write_all(suffix.as_bytes())?;
        } else {
            out.write_all(b"\n\n")?;
            out.write_all(document.as_bytes())?;
        }
        out.flush()?;
        self.printed.clear();
        self.printed.push_str(document);
        Ok(())
    }

    /// Text written so far.
    #[must_use]
    pub fn printed(&self) -> &str {
        &self.printed
    }
}

/// Formats the result of a solve command.
#[must_use]
pub fn format_solve_result(
    update: &SolveUpdate,
    archive: Option<&SavedArchive>,
    show_log: bool,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::from("\n");
            if show_log && !update.log.is_empty() {
                output.push_str("\n---\n\nInteraction log:\n\n");
                output.push_str(&update.log);
                output.push('\n');
            }
            if let Some(archive) = archive {
                let _ = writeln!(output, "\nSaved: {}", archive.zip_path.display());
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct SolveResult<'a> {
                #[serde(flatten)]
                update: &'a SolveUpdate,
                archive: Option<String>,
            }
            format_json(&SolveResult {
                update,
                archive: archive.map(|a| a.zip_path.to_string_lossy().to_string()),
            })
        }
    }
}

/// Formats a model pair.
#[must_use]
pub fn format_models(models: &ModelPair, complex: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Mode:          {}",
                if complex { "complex" } else { "simple" }
            );
            let _ = writeln!(output, "  Image model:  {}", models.image);
            let _ = writeln!(output, "  Solver model: {}", models.solver);
            output
        }
        OutputFormat::Json => format_json(&serde_json::json!({
            "mode": if complex { "complex" } else { "simple" },
            "image_model": models.image,
            "solver_model": models.solver,
        })),
    }
}

/// Formats converted text.
#[must_use]
pub fn format_converted(converted: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => converted.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({ "converted": converted })),
    }
}

/// Formats an error for output.
#[must_use]
pub fn format_error(error: &crate::Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({ "error": error.to_string() })),
    }
}

fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": format!("serialization failed: {e}") }).to_string()
    });
    json.push('\n');
    json
}
