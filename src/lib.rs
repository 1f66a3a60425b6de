//! # theoryx-rs
//!
//! Streaming solver for theoretical mechanics problems.
//!
//! A problem statement, optionally with a figure, is sent through two model
//! calls: one describes the figure, the other writes a step-by-step
//! solution. Both responses are streamed, and the solution's LaTeX math is
//! rewritten to markdown math while it streams.
//!
//! ## Features
//!
//! - **Streaming formula filter**: `\[ \]` and `\( \)` become `$$ $$` and `$ $`
//!   fragment by fragment, without dangling fences in intermediate output
//! - **Solver**: lazy stream of whole-document updates, errors rendered in place
//! - **Archives**: finished solutions bundled as markdown plus image in a zip

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod archive;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod formula;
pub mod image;
pub mod interaction;
pub mod llm;
pub mod logging;
pub mod prompts;
pub mod solver;

// Re-export commonly used types at crate root
pub use error::{Error, Result, SolveError};

// Re-export formula conversion
pub use formula::{FormulaFilter, convert};

// Re-export solver types
pub use config::{ModelCatalog, ModelPair, Settings};
pub use document::OutputDocument;
pub use image::ImageInput;
pub use interaction::{InteractionLog, LogSink, TracingLogSink};
pub use llm::{ChatClient, ChatMessage, Fragment, FragmentStream, OpenAiClient};
pub use solver::{Phase, SolveUpdate, Solver};

// Re-export archive and CLI types
pub use archive::{SavedArchive, save_solution};
pub use cli::{Cli, Commands, OutputFormat};
