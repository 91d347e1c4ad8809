//! HTTP server exposing the worker contract and the agent loop.
//!
//! `POST /chat` takes a JSON array of messages and answers with one
//! `{role, content}` message, so a `tenke` client with the worker provider
//! can point at it. `POST /agent` runs the tool-dispatch loop server-side.

use crate::agent::{builtin_registry, Agent, StopReason, ToolRegistry};
use crate::chat::{ChatEndpoint, Message, OpenAIEndpoint, Transcript};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{EndpointProvider, Prompts, Settings};
use crate::error::TenkeError;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

/// Shared application state.
pub(crate) struct AppState {
    endpoint: Arc<dyn ChatEndpoint>,
    tools: ToolRegistry,
    prompts: Prompts,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tenke doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    // The server is the worker, so it always relays to OpenAI directly.
    let mut relay = settings.endpoint.clone();
    relay.provider = EndpointProvider::OpenAI;
    let endpoint: Arc<dyn ChatEndpoint> = Arc::new(OpenAIEndpoint::from_settings(&relay)?);

    let state = Arc::new(AppState {
        endpoint,
        tools: builtin_registry(&settings.tools),
        prompts: Prompts::from_settings(&settings)?,
        settings,
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Tenke API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Chat", "POST /chat");
    Output::kv("Agent", "POST /agent");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/agent", post(agent))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AgentRequest {
    /// Full initial conversation. Takes precedence over `task`.
    #[serde(default)]
    messages: Option<Vec<Message>>,
    /// Task to seed a conversation with the built-in system prompt.
    #[serde(default)]
    task: Option<String>,
    /// Lower turn limit for this run. Capped at `agent.max_turns`.
    #[serde(default)]
    max_turns: Option<usize>,
}

#[derive(Serialize)]
struct AgentResponse {
    run_id: Uuid,
    stop_reason: StopReason,
    turns: usize,
    answer: Option<String>,
    transcript: Transcript,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<Transcript>,
}

fn status_for(err: &TenkeError) -> StatusCode {
    match err {
        TenkeError::UnknownTool(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TenkeError::Transport(_) | TenkeError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(messages): Json<Vec<Message>>,
) -> impl IntoResponse {
    match state.endpoint.complete(&messages).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => (
            status_for(&e),
            Json(ErrorResponse {
                error: e.to_string(),
                kind: e.kind(),
                transcript: None,
            }),
        )
            .into_response(),
    }
}

async fn agent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AgentRequest>,
) -> impl IntoResponse {
    let mut transcript = match req.messages {
        Some(messages) => Transcript::from(messages),
        None => Transcript::seed(
            state.prompts.agent_system(&state.tools.catalog()),
            req.task
                .unwrap_or_else(|| state.settings.agent.default_task.clone()),
        ),
    };

    let ceiling = state.settings.agent.max_turns;
    let max_turns = req.max_turns.map_or(ceiling, |n| n.min(ceiling));

    let agent = Agent::new(state.endpoint.clone(), state.tools.clone())
        .with_max_turns(max_turns)
        .with_request_timeout(state.settings.endpoint.timeout());

    match agent.run(&mut transcript).await {
        Ok(run) => {
            info!(run_id = %run.run_id, turns = run.turns, "Agent run finished");
            Json(AgentResponse {
                run_id: run.run_id,
                stop_reason: run.stop,
                turns: run.turns,
                answer: transcript.last_assistant().map(|m| m.content.clone()),
                transcript,
            })
            .into_response()
        }
        Err(e) => (
            status_for(&e),
            Json(ErrorResponse {
                error: e.to_string(),
                kind: e.kind(),
                transcript: Some(transcript),
            }),
        )
            .into_response(),
    }
}
