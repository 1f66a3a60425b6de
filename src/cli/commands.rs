//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::archive::{SavedArchive, save_solution};
use crate::cli::output::{
    OutputFormat, ProgressPrinter, format_converted, format_models, format_solve_result,
};
use crate::cli::parser::{ApiArgs, Cli, Commands};
use crate::config::Settings;
use crate::error::{CommandError, IoError, Result};
use crate::formula::convert;
use crate::image::ImageInput;
use crate::interaction::TracingLogSink;
use crate::llm::OpenAiClient;
use crate::solver::{Phase, SolveUpdate, Solver};
use futures_util::StreamExt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::pin::pin;

/// Executes the CLI command.
///
/// Streaming progress is written to `out` as it arrives; the returned string
/// is printed after the command finishes.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub async fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Solve {
            text,
            file,
            image,
            complex,
            save,
            show_log,
        } => {
            let request = SolveCommand {
                text: text.as_deref(),
                file: file.as_deref(),
                image: image.as_deref(),
                complex: *complex,
                save: save.as_ref(),
                show_log: *show_log,
            };
            cmd_solve(&cli.api, &request, format, out).await
        }
        Commands::Convert { file } => cmd_convert(file.as_deref(), format),
        Commands::Models { complex } => cmd_models(&cli.api, *complex, format),
    }
}

/// Arguments of the `solve` command.
struct SolveCommand<'a> {
    text: Option<&'a str>,
    file: Option<&'a Path>,
    image: Option<&'a Path>,
    complex: bool,
    save: Option<&'a PathBuf>,
    show_log: bool,
}

fn load_settings(api: &ApiArgs) -> Result<Settings> {
    Settings::from_lookup(|key| api.lookup(key))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(IoError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                }
                .into());
            }
            std::fs::read_to_string(path).map_err(|e| {
                IoError::ReadFailed {
                    path: path.to_string_lossy().to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

// ==================== Command Implementations ====================

async fn cmd_solve<W: Write>(
    api: &ApiArgs,
    request: &SolveCommand<'_>,
    format: OutputFormat,
    out: &mut W,
) -> Result<String> {
    let settings = load_settings(api)?;

    let problem = match request.text {
        Some(text) => text.to_string(),
        None => read_input(request.file)?,
    };
    let problem = problem.trim();
    if problem.is_empty() {
        return Err(CommandError::MissingArgument("problem text".to_string()).into());
    }

    let image = request.image.map(ImageInput::from_path).transpose()?;

    let solver = Solver::new(
        OpenAiClient::from_settings(&settings),
        settings.models.clone(),
        TracingLogSink,
    );

    let mut printer = ProgressPrinter::new();
    let mut last = None;
    let mut updates = pin!(solver.solve(problem, image.as_ref(), request.complex));
    while let Some(update) = updates.next().await {
        tracing::debug!(phase = ?update.phase, chars = update.document.len(), "solve progress");
        if format == OutputFormat::Text {
            printer.update(out, &update.document)?;
        }
        last = Some(update);
    }

    let last = last.unwrap_or_else(|| SolveUpdate {
        document: String::new(),
        log: String::new(),
        phase: Phase::Failed,
    });

    let archive: Option<SavedArchive> = match request.save {
        Some(dir) if last.phase == Phase::Done => Some(save_solution(
            dir,
            problem,
            image.as_ref(),
            &last.document,
        )?),
        Some(_) => {
            tracing::warn!("solve did not finish; nothing saved");
            None
        }
        None => None,
    };

    Ok(format_solve_result(
        &last,
        archive.as_ref(),
        request.show_log,
        format,
    ))
}

fn cmd_convert(file: Option<&Path>, format: OutputFormat) -> Result<String> {
    let input = read_input(file)?;
    Ok(format_converted(&convert(&input), format))
}

fn cmd_models(api: &ApiArgs, complex: bool, format: OutputFormat) -> Result<String> {
    let settings = load_settings(api)?;
    Ok(format_models(settings.models(complex), complex, format))
}
