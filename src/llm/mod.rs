//! Chat-completion boundary.
//!
//! The solver only sees the types in this module: a prompt made of
//! [`ChatMessage`]s and a [`FragmentStream`] of [`Fragment`]s coming back.
//! Provider adapters such as [`OpenAiClient`] translate to and from the wire
//! types so nothing above this layer inspects optional response fields.

pub mod openai;

use crate::error::LlmError;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

pub use openai::OpenAiClient;

/// Sampling temperature used for every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.01;

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End-user input.
    User,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// An image reference, usually a base64 data URL.
    ImageUrl {
        /// The image location.
        image_url: ImageUrl,
    },
}

/// Image location inside a [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// URL or data URL.
    pub url: String,
}

/// Message body: plain text or a list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Mixed text and image parts.
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenates all text carried by this content.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A single prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: Role,
    /// Message body.
    pub content: MessageContent,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Creates a plain-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Creates a user message with a text part followed by an image part.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Reasoning budget hint for reasoning models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    /// Low effort.
    Low,
    /// Medium effort.
    Medium,
    /// High effort.
    High,
}

/// Per-request options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Reasoning budget, only sent when set.
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            reasoning_effort: None,
        }
    }
}

impl ChatOptions {
    /// Options for a solver request.
    ///
    /// Complex mode on an `o3` reasoning model asks for high effort.
    #[must_use]
    pub fn for_solver(model: &str, complex: bool) -> Self {
        let reasoning_effort = (complex && model.starts_with("o3")).then_some(ReasoningEffort::High);
        Self {
            reasoning_effort,
            ..Self::default()
        }
    }
}

/// One step of a response stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    /// Whether the step carried any text delta.
    pub has_content: bool,
    /// The text delta, empty when `has_content` is `false`.
    pub text: String,
}

impl Fragment {
    /// A fragment carrying text.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            has_content: true,
            text: text.into(),
        }
    }

    /// A step without text (role headers, usage chunks, keep-alives).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One-shot stream of response fragments.
pub type FragmentStream = BoxStream<'static, Result<Fragment, LlmError>>;

/// Streaming chat-completion client.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Opens a response stream for `messages` on `model`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Request`] if the request could not be started.
    /// Faults after the stream is open surface as stream items.
    async fn stream_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<FragmentStream, LlmError>;
}
