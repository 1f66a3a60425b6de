//! Interaction logs for remote model calls.
//!
//! Every finished or failed stream produces one [`InteractionLog`]. Image
//! payloads are redacted before the log is built, so logs stay small and
//! never carry user images.

use crate::llm::{ChatMessage, ContentPart, ImageUrl, MessageContent};
use serde::Serialize;

/// Placeholder written in place of image payloads.
pub const REDACTED_IMAGE: &str = "[image data omitted]";

/// `tracing` target of interaction log events.
pub const INTERACTION_TARGET: &str = "theoryx::interaction";

/// Timestamp format used in interaction logs.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a remote call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// The call returned this response text.
    Response(&'a str),
    /// The call failed with this error text.
    Error(&'a str),
}

impl Outcome<'_> {
    /// Returns `true` for failed calls.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    const fn text(&self) -> &str {
        match self {
            Self::Response(text) | Self::Error(text) => text,
        }
    }
}

/// Record of one remote model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionLog {
    /// Local time the record was created.
    pub timestamp: String,
    /// Model identifier.
    pub model: String,
    /// Prompt with image payloads redacted.
    pub messages: Vec<ChatMessage>,
    /// Response text, or the error text for failed calls.
    pub response: String,
}

impl InteractionLog {
    /// Creates a record stamped with the current local time.
    #[must_use]
    pub fn new(model: &str, messages: &[ChatMessage], outcome: Outcome<'_>) -> Self {
        Self {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            model: model.to_string(),
            messages: redact_images(messages),
            response: outcome.text().to_string(),
        }
    }

    /// Pretty JSON rendering of the record.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Replaces every image URL with [`REDACTED_IMAGE`].
#[must_use]
pub fn redact_images(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|message| match &message.content {
            MessageContent::Text(_) => message.clone(),
            MessageContent::Parts(parts) => ChatMessage {
                role: message.role,
                content: MessageContent::Parts(
                    parts
                        .iter()
                        .map(|part| match part {
                            ContentPart::Text { .. } => part.clone(),
                            ContentPart::ImageUrl { .. } => ContentPart::ImageUrl {
                                image_url: ImageUrl {
                                    url: REDACTED_IMAGE.to_string(),
                                },
                            },
                        })
                        .collect(),
                ),
            },
        })
        .collect()
}

/// Destination for interaction logs.
pub trait LogSink: Send + Sync {
    /// Records one finished call and returns its rendered log text.
    fn record(&self, model: &str, messages: &[ChatMessage], outcome: Outcome<'_>) -> String;
}

/// Sink that writes interaction logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn record(&self, model: &str, messages: &[ChatMessage], outcome: Outcome<'_>) -> String {
        let log = InteractionLog::new(model, messages, outcome).to_json();
        tracing::info!(target: INTERACTION_TARGET, "{log}");
        if let Outcome::Error(error) = outcome {
            tracing::error!(model, error, "model call failed");
        }
        log
    }
}
