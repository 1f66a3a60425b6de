//! Problem images and the image description step.
//!
//! [`describe_image`] streams a model's description of a problem figure. It
//! ends with exactly one [`DescriptionEvent::Finished`] carrying a tagged
//! [`DescriptionOutcome`], so callers never have to inspect the text to tell
//! a failure from a description.

use crate::error::{IoError, Result, SolveError};
use crate::interaction::{LogSink, Outcome};
use crate::llm::{ChatClient, ChatOptions};
use crate::prompts;
use async_stream::stream;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::{Stream, StreamExt};
use std::path::Path;

/// An image attached to a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageInput {
    /// Wraps raw image bytes.
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Reads an image file, inferring the MIME type from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(IoError::FileNotFound { path: path_str }.into());
        }

        let bytes = std::fs::read(path).map_err(|e| IoError::ReadFailed {
            path: path_str,
            reason: e.to_string(),
        })?;

        Ok(Self::from_bytes(bytes, mime_type_for(path)))
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, e.g. `image/png`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File extension matching the MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    /// `data:` URL embedding the base64 image.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, encode_image(self))
    }
}

/// Encodes an image as standard base64.
#[must_use]
pub fn encode_image(image: &ImageInput) -> String {
    STANDARD.encode(&image.bytes)
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Final result of the description step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionOutcome {
    /// The model described the image.
    Described {
        /// Full description text.
        text: String,
        /// Rendered interaction log.
        log: String,
    },
    /// The step failed.
    Failed {
        /// What went wrong, always [`SolveError::ImageProcessing`].
        error: SolveError,
        /// Rendered interaction log.
        log: String,
    },
}

/// Progress of the description step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionEvent {
    /// Description received so far.
    Partial(String),
    /// Terminal event.
    Finished(DescriptionOutcome),
}

/// Streams a description of `image` in the context of `problem`.
///
/// Yields one [`DescriptionEvent::Partial`] per content fragment followed by
/// exactly one [`DescriptionEvent::Finished`].
pub fn describe_image<'a, C, S>(
    client: &'a C,
    sink: &'a S,
    model: &'a str,
    problem: &'a str,
    image: &'a ImageInput,
) -> impl Stream<Item = DescriptionEvent> + 'a
where
    C: ChatClient + ?Sized,
    S: LogSink + ?Sized,
{
    stream! {
        let messages = prompts::image_messages(problem, &image.data_url());
        let mut description = String::new();
        let mut cause = None;

        match client.stream_chat(model, &messages, &ChatOptions::default()).await {
            Err(err) => cause = Some(SolveError::Upstream(err.to_string())),
            Ok(mut fragments) => {
                let mut received = false;
                while let Some(item) = fragments.next().await {
                    match item {
                        Ok(fragment) if fragment.has_content => {
                            received = true;
                            description.push_str(&fragment.text);
                            yield DescriptionEvent::Partial(description.clone());
                        }
                        Ok(_) => {}
                        Err(err) => {
                            cause = Some(SolveError::Upstream(err.to_string()));
                            break;
                        }
                    }
                }
                if cause.is_none() && !received {
                    cause = Some(SolveError::EmptyResponse);
                }
            }
        }

        let outcome = match cause {
            None => {
                let log = sink.record(model, &messages, Outcome::Response(&description));
                tracing::info!(model, chars = description.len(), "image description complete");
                DescriptionOutcome::Described { text: description, log }
            }
            Some(cause) => {
                let error = SolveError::ImageProcessing(cause.to_string());
                let log = sink.record(model, &messages, Outcome::Error(&error.to_string()));
                DescriptionOutcome::Failed { error, log }
            }
        };
        yield DescriptionEvent::Finished(outcome);
    }
}
