//! Solution orchestration.
//!
//! A solve request runs through `Started → (Describing) → Solving → Done`,
//! or ends in `Failed` from any phase. The [`Solver`] drives at most one
//! upstream stream at a time and republishes the whole document after every
//! fragment. Nothing here fails outward: every error becomes a block of the
//! document.
//!
//! # Examples
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use theoryx_rs::config::Settings;
//! use theoryx_rs::interaction::TracingLogSink;
//! use theoryx_rs::llm::OpenAiClient;
//! use theoryx_rs::solver::Solver;
//!
//! # async fn run() -> theoryx_rs::Result<()> {
//! let settings = Settings::from_env()?;
//! let solver = Solver::new(
//!     OpenAiClient::from_settings(&settings),
//!     settings.models.clone(),
//!     TracingLogSink,
//! );
//! let mut updates = std::pin::pin!(solver.solve("A ladder leans on a wall...", None, false));
//! while let Some(update) = updates.next().await {
//!     println!("{}", update.document);
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::ModelCatalog;
use crate::document::OutputDocument;
use crate::error::SolveError;
use crate::formula::FormulaFilter;
use crate::image::{DescriptionEvent, DescriptionOutcome, ImageInput, describe_image};
use crate::interaction::{LogSink, Outcome};
use crate::llm::{ChatClient, ChatOptions};
use crate::prompts;
use async_stream::stream;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use std::pin::pin;

/// Heading of the image description block.
pub const IMAGE_HEADING: &str = "# Image description";

/// Phase of a solve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Request accepted, nothing streamed yet.
    Started,
    /// Streaming the image description.
    Describing,
    /// Streaming the solution.
    Solving,
    /// Finished successfully.
    Done,
    /// Finished with an error block.
    Failed,
}

impl Phase {
    /// Returns `true` for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// One emission of a solve request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveUpdate {
    /// Full rendered document so far.
    pub document: String,
    /// Interaction logs, only filled on terminal emissions.
    pub log: String,
    /// Phase that produced this emission.
    pub phase: Phase,
}

impl SolveUpdate {
    fn progress(document: &OutputDocument, phase: Phase) -> Self {
        Self {
            document: document.render(),
            log: String::new(),
            phase,
        }
    }
}

/// Header of the solver block.
#[must_use]
pub fn solver_heading(model: &str) -> String {
    format!("# {model} solving process")
}

/// Header of the solver error block.
#[must_use]
pub fn solver_error_heading(model: &str) -> String {
    format!("# {model} solving error")
}

/// Orchestrates image description and solving for one request at a time.
///
/// The solver owns no per-request state; each [`Solver::solve`] call builds
/// its own document, filter and log list.
#[derive(Debug, Clone)]
pub struct Solver<C, S> {
    client: C,
    models: ModelCatalog,
    sink: S,
}

impl<C, S> Solver<C, S>
where
    C: ChatClient,
    S: LogSink,
{
    /// Creates a solver from its collaborators.
    pub const fn new(client: C, models: ModelCatalog, sink: S) -> Self {
        Self {
            client,
            models,
            sink,
        }
    }

    /// Chat client used for every request.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Sink receiving interaction logs.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Solves `problem`, optionally with a figure.
    ///
    /// Returns a lazy stream: an empty `Started` emission, one emission per
    /// received fragment, then one terminal emission. Upstream streams are
    /// only opened as the returned stream is polled; dropping it stops all
    /// work.
    pub fn solve<'a>(
        &'a self,
        problem: &'a str,
        image: Option<&'a ImageInput>,
        complex: bool,
    ) -> impl Stream<Item = SolveUpdate> + 'a {
        stream! {
            let models = self.models.select(complex);
            let mut document = OutputDocument::new();
            let mut logs: Vec<String> = Vec::new();
            let mut description = None;

            tracing::info!(complex, has_image = image.is_some(), "solve request started");
            yield SolveUpdate::progress(&document, Phase::Started);

            if let Some(image) = image {
                let mut events = pin!(describe_image(
                    &self.client,
                    &self.sink,
                    &models.image,
                    problem,
                    image,
                ));
                while let Some(event) = events.next().await {
                    match event {
                        DescriptionEvent::Partial(text) => {
                            document.set_live(format!("{IMAGE_HEADING}\n\n{text}"));
                            yield SolveUpdate::progress(&document, Phase::Describing);
                        }
                        DescriptionEvent::Finished(DescriptionOutcome::Described { text, log }) => {
                            document.commit(format!("{IMAGE_HEADING}\n\n{text}"));
                            logs.push(log);
                            description = Some(text);
                        }
                        DescriptionEvent::Finished(DescriptionOutcome::Failed { error, log }) => {
                            tracing::error!(model = %models.image, %error, "image description failed");
                            yield SolveUpdate {
                                document: error.to_string(),
                                log,
                                phase: Phase::Failed,
                            };
                            return;
                        }
                    }
                }
            }

            let heading = solver_heading(&models.solver);
            document.set_live(format!("{heading}\n\n"));

            let messages = prompts::solver_messages(problem, description.as_deref());
            let options = ChatOptions::for_solver(&models.solver, complex);
            let mut filter = FormulaFilter::new();
            let mut received = 0usize;

            let cause = match self.client.stream_chat(&models.solver, &messages, &options).await {
                Err(err) => Some(SolveError::Upstream(err.to_string())),
                Ok(mut fragments) => {
                    let mut cause = None;
                    while let Some(item) = fragments.next().await {
                        match item {
                            Ok(fragment) if fragment.has_content => {
                                received += 1;
                                let output = filter.push(&fragment.text);
                                document.set_live(format!("{heading}\n\n{output}"));
                                yield SolveUpdate::progress(&document, Phase::Solving);
                            }
                            Ok(_) => {}
                            Err(err) => {
                                cause = Some(SolveError::Upstream(err.to_string()));
                                break;
                            }
                        }
                    }
                    if cause.is_none() && received == 0 {
                        cause = Some(SolveError::EmptyResponse);
                    }
                    cause
                }
            };

            match cause {
                None => {
                    let content = format!("{heading}\n\n{}", filter.finish());
                    logs.push(self.sink.record(&models.solver, &messages, Outcome::Response(&content)));
                    document.commit(content);
                    tracing::info!(model = %models.solver, fragments = received, "solve request complete");
                    yield SolveUpdate {
                        document: document.render(),
                        log: logs.join("\n\n"),
                        phase: Phase::Done,
                    };
                }
                Some(error) => {
                    self.sink.record(&models.solver, &messages, Outcome::Error(&error.to_string()));
                    document.append(format!("{}\n\n{error}", solver_error_heading(&models.solver)));
                    yield SolveUpdate {
                        document: document.render(),
                        log: logs.join("\n\n"),
                        phase: Phase::Failed,
                    };
                }
            }
        }
    }
}
