//! OpenAI chat completions endpoint.

use super::{ChatEndpoint, Message, Role};
use crate::config::EndpointSettings;
use crate::error::{Result, TenkeError};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat endpoint that calls the OpenAI API directly.
pub struct OpenAIEndpoint {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEndpoint {
    /// Create an endpoint with an explicit key and timeout.
    pub fn with_config(model: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(api_key, timeout)?,
            model: model.to_string(),
        })
    }

    /// Create an endpoint from the `[endpoint]` configuration section.
    pub fn from_settings(settings: &EndpointSettings) -> Result<Self> {
        let key = settings.api_key();
        Self::with_config(&settings.model, key.as_deref(), settings.timeout())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Convert a transcript message into the request type async-openai expects.
fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let content = message.content.clone();
    let converted = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| TenkeError::OpenAI(e.to_string()))?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| TenkeError::OpenAI(e.to_string()))?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| TenkeError::OpenAI(e.to_string()))?
            .into(),
    };
    Ok(converted)
}

#[async_trait]
impl ChatEndpoint for OpenAIEndpoint {
    #[instrument(skip(self, messages), fields(model = %self.model, count = messages.len()))]
    async fn complete(&self, messages: &[Message]) -> Result<Message> {
        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .build()
            .map_err(|e| TenkeError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TenkeError::Transport(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TenkeError::Transport("No response from model".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        debug!("Model replied with {} bytes", content.len());
        Ok(Message::assistant(content))
    }
}
