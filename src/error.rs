//! Error types for theoryx operations.
//!
//! This module provides the crate error hierarchy using `thiserror`. The
//! [`SolveError`] kinds are special: they never escape the solver and are
//! rendered into the output document instead.

use thiserror::Error;

/// Result type alias for theoryx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing or invalid settings).
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Model API errors.
    #[error("model API error: {0}")]
    Llm(#[from] LlmError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Solution archive errors.
    #[error("archive error: {message}")]
    Archive {
        /// Description of the archive error.
        message: String,
    },

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Errors raised at the chat-completion boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The stream faulted after it was opened.
    #[error("stream interrupted: {0}")]
    Stream(String),
}

/// Failure kinds of a single solve request.
///
/// All of these are caught by the solver and turned into a readable block
/// of the output document plus an interaction log entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The stream finished without yielding any content.
    #[error("no response received from the model")]
    EmptyResponse,

    /// The remote call failed or faulted mid-stream.
    #[error("model response failed: {0}")]
    Upstream(String),

    /// The image description step failed.
    #[error("image processing failed: {0}")]
    ImageProcessing(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<async_openai::error::OpenAIError> for LlmError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive {
            message: err.to_string(),
        }
    }
}
