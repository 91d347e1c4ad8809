//! Worker proxy endpoint.
//!
//! The worker accepts a JSON array of `{role, content}` objects and answers
//! with a JSON object carrying at least a `content` field.

use super::{ChatEndpoint, Message};
use crate::error::{Result, TenkeError};
use crate::openai::DEFAULT_TIMEOUT_SECS;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Chat endpoint backed by a worker proxy URL.
pub struct WorkerEndpoint {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct WorkerReply {
    content: String,
}

impl WorkerEndpoint {
    /// Create a worker endpoint with the default request timeout.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a worker endpoint with a custom request timeout.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key: None,
        })
    }

    /// Send a bearer token with every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[async_trait]
impl ChatEndpoint for WorkerEndpoint {
    #[instrument(skip(self, messages), fields(url = %self.url, count = messages.len()))]
    async fn complete(&self, messages: &[Message]) -> Result<Message> {
        let mut request = self.client.post(self.url.clone()).json(messages);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TenkeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TenkeError::Transport(format!(
                "HTTP error! status: {} {}",
                status,
                body.trim()
            )));
        }

        let reply: WorkerReply = response
            .json()
            .await
            .map_err(|e| TenkeError::Transport(format!("Invalid worker response: {}", e)))?;

        debug!("Worker replied with {} bytes", reply.content.len());
        Ok(Message::assistant(reply.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/chat-turbo", addr)
    }

    #[tokio::test]
    async fn test_posts_message_array() {
        let app = Router::new().route(
            "/chat-turbo",
            post(|Json(messages): Json<Vec<Message>>| async move {
                Json(serde_json::json!({
                    "role": "assistant",
                    "content": format!("{} messages, last: {}", messages.len(), messages[messages.len() - 1].content),
                    "refusal": null
                }))
            }),
        );
        let url = spawn(app).await;

        let endpoint = WorkerEndpoint::new(&url).unwrap();
        let reply = endpoint
            .complete(&[Message::system("protocol"), Message::user("hello")])
            .await
            .unwrap();

        assert_eq!(reply, Message::assistant("2 messages, last: hello"));
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let app = Router::new().route(
            "/chat-turbo",
            post(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string();
                Json(serde_json::json!({ "content": auth }))
            }),
        );
        let url = spawn(app).await;

        let endpoint = WorkerEndpoint::new(&url).unwrap().with_api_key("secret");
        let reply = endpoint.complete(&[Message::user("hi")]).await.unwrap();
        assert_eq!(reply.content, "Bearer secret");
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let app = Router::new().route(
            "/chat-turbo",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let url = spawn(app).await;

        let err = WorkerEndpoint::new(&url)
            .unwrap()
            .complete(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, TenkeError::Transport(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_missing_content_is_transport_error() {
        let app = Router::new().route(
            "/chat-turbo",
            post(|| async { Json(serde_json::json!({ "text": "wrong field" })) }),
        );
        let url = spawn(app).await;

        let err = WorkerEndpoint::new(&url)
            .unwrap()
            .complete(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, TenkeError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = WorkerEndpoint::new(&format!("http://{}/chat", addr))
            .unwrap()
            .complete(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            WorkerEndpoint::new("not a url"),
            Err(TenkeError::Url(_))
        ));
    }
}
