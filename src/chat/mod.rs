//! Chat endpoints and the message types exchanged with them.
//!
//! A chat endpoint takes the whole ordered conversation and answers with a
//! single assistant message. Transport and authentication live in the
//! implementations; callers only see [`ChatEndpoint::complete`].

#[cfg(test)]
pub(crate) mod mock;
mod openai;
mod transcript;
mod worker;

pub use openai::OpenAIEndpoint;
pub use transcript::Transcript;
pub use worker::WorkerEndpoint;

use crate::config::{EndpointProvider, EndpointSettings};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A remote chat-completion service.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send the full conversation and return the model's reply.
    ///
    /// Any failure to obtain a reply is reported as
    /// [`TenkeError::Transport`](crate::error::TenkeError::Transport).
    async fn complete(&self, messages: &[Message]) -> Result<Message>;
}

/// Build the endpoint described by the configuration.
pub fn endpoint_from_settings(settings: &EndpointSettings) -> Result<Arc<dyn ChatEndpoint>> {
    match settings.provider {
        EndpointProvider::Worker => {
            let mut endpoint = WorkerEndpoint::with_timeout(&settings.url, settings.timeout())?;
            if let Some(key) = settings.api_key() {
                endpoint = endpoint.with_api_key(key);
            }
            Ok(Arc::new(endpoint))
        }
        EndpointProvider::OpenAI => Ok(Arc::new(OpenAIEndpoint::from_settings(settings)?)),
    }
}

/// Ask a single question: one system message, one user message, one reply.
pub async fn ask(endpoint: &dyn ChatEndpoint, system: &str, question: &str) -> Result<String> {
    let messages = [Message::system(system), Message::user(question)];
    let reply = endpoint.complete(&messages).await?;
    Ok(reply.content)
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedEndpoint;
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);

        let parsed: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"Answer: go hiking"}"#).unwrap();
        assert_eq!(parsed, Message::assistant("Answer: go hiking"));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let parsed = serde_json::from_str::<Message>(r#"{"role":"tool","content":"x"}"#);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_ask_sends_system_and_user() {
        let endpoint = ScriptedEndpoint::new().reply("Buy.");
        let answer = ask(&endpoint, "You are a trading guru.", "Here is the stock data: {}")
            .await
            .unwrap();

        assert_eq!(answer, "Buy.");
        let calls = endpoint.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![
                Message::system("You are a trading guru."),
                Message::user("Here is the stock data: {}"),
            ]
        );
    }

    #[test]
    fn test_endpoint_from_settings_rejects_bad_url() {
        let settings = EndpointSettings {
            url: "::not a url::".to_string(),
            ..EndpointSettings::default()
        };
        assert!(endpoint_from_settings(&settings).is_err());
    }
}
