//! Scripted chat endpoint for tests.

use super::{ChatEndpoint, Message};
use crate::error::{Result, TenkeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Replays queued replies in order and records every request it receives.
///
/// An exhausted script answers with a transport error.
#[derive(Default)]
pub(crate) struct ScriptedEndpoint {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
    delay: Option<Duration>,
}

impl ScriptedEndpoint {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue an assistant reply.
    pub(crate) fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Queue a transport failure.
    pub(crate) fn fail(self, reason: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Err(reason.into()));
        self
    }

    /// Sleep before answering each request.
    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every message list received so far, in call order.
    pub(crate) fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatEndpoint for ScriptedEndpoint {
    async fn complete(&self, messages: &[Message]) -> Result<Message> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(Message::assistant(content)),
            Some(Err(reason)) => Err(TenkeError::Transport(reason)),
            None => Err(TenkeError::Transport("script exhausted".to_string())),
        }
    }
}
