//! `async-openai` adapter.

use super::{
    ChatClient, ChatMessage, ChatOptions, ContentPart, Fragment, FragmentStream, MessageContent,
    ReasoningEffort, Role,
};
use crate::config::Settings;
use crate::error::LlmError;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionStreamResponse, ImageUrlArgs,
};
use async_trait::async_trait;
use futures_util::StreamExt;

/// Chat client for any OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiClient {
    /// Creates a client for the given endpoint and key.
    pub fn new(api_base_url: &str, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base_url)
            .with_api_key(api_key);
        Self {
            client: Client::with_config(config),
        }
    }

    /// Creates a client from validated settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.api_base_url, &settings.api_key)
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn stream_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<FragmentStream, LlmError> {
        let request = build_request(model, messages, options)?;
        tracing::debug!(model, messages = messages.len(), "opening chat completion stream");

        let stream = self.client.chat().create_stream(request).await?;
        Ok(stream
            .map(|item| {
                item.map(|response| to_fragment(&response))
                    .map_err(|e| LlmError::Stream(e.to_string()))
            })
            .boxed())
    }
}

fn build_request(
    model: &str,
    messages: &[ChatMessage],
    options: &ChatOptions,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    let messages = messages
        .iter()
        .map(to_request_message)
        .collect::<Result<Vec<_>, _>>()?;

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(model)
        .messages(messages)
        .temperature(options.temperature)
        .stream(true);
    if let Some(effort) = options.reasoning_effort {
        args.reasoning_effort(to_reasoning_effort(effort));
    }
    args.build()
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    match (message.role, &message.content) {
        (Role::System, content) => Ok(ChatCompletionRequestSystemMessageArgs::default()
            .content(content.text())
            .build()?
            .into()),
        (Role::User, MessageContent::Text(text)) => Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(text.as_str())
            .build()?
            .into()),
        (Role::User, MessageContent::Parts(parts)) => {
            let parts = parts
                .iter()
                .map(to_content_part)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(parts))
                .build()?
                .into())
        }
    }
}

fn to_content_part(
    part: &ContentPart,
) -> Result<ChatCompletionRequestUserMessageContentPart, OpenAIError> {
    match part {
        ContentPart::Text { text } => Ok(ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(text.as_str())
                .build()?,
        )),
        ContentPart::ImageUrl { image_url } => {
            Ok(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(ImageUrlArgs::default().url(image_url.url.as_str()).build()?)
                    .build()?,
            ))
        }
    }
}

const fn to_reasoning_effort(effort: ReasoningEffort) -> async_openai::types::ReasoningEffort {
    match effort {
        ReasoningEffort::Low => async_openai::types::ReasoningEffort::Low,
        ReasoningEffort::Medium => async_openai::types::ReasoningEffort::Medium,
        ReasoningEffort::High => async_openai::types::ReasoningEffort::High,
    }
}

/// Maps a wire chunk to a [`Fragment`]; only the first choice is read.
fn to_fragment(response: &CreateChatCompletionStreamResponse) -> Fragment {
    response
        .choices
        .first()
        .and_then(|choice| choice.delta.content.as_deref())
        .map_or_else(Fragment::empty, Fragment::content)
}
