//! Agent runner with the tool-dispatch loop.

use super::directive::{parse_directive, Directive, Parsed};
use super::tools::ToolRegistry;
use crate::chat::{ChatEndpoint, Message, Transcript};
use crate::error::{Result, TenkeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Default turn limit for a run.
pub const DEFAULT_MAX_TURNS: usize = 5;

/// Prefix of the user message that carries a tool result back to the model.
pub const OBSERVATION_PREFIX: &str = "Observation: ";

/// Drives a bounded Thought/Action/Observation exchange with a chat endpoint.
pub struct Agent {
    endpoint: Arc<dyn ChatEndpoint>,
    tools: ToolRegistry,
    max_turns: usize,
    request_timeout: Option<Duration>,
}

impl Agent {
    /// Create a new agent over the given endpoint and tools.
    pub fn new(endpoint: Arc<dyn ChatEndpoint>, tools: ToolRegistry) -> Self {
        Self {
            endpoint,
            tools,
            max_turns: DEFAULT_MAX_TURNS,
            request_timeout: None,
        }
    }

    /// Set the maximum number of turns for the loop.
    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    /// Bound every endpoint call; an expired call fails the run as a transport error.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Run the loop, appending to `transcript`.
    ///
    /// Each turn sends the whole transcript, appends the reply, and either
    /// stops (no directive), aborts (unknown tool, failing tool, transport
    /// error) or appends an observation and continues. On error the
    /// transcript keeps everything appended before the failure.
    pub async fn run(&self, transcript: &mut Transcript) -> Result<AgentRun> {
        let run_id = Uuid::new_v4();
        let span = info_span!("agent_run", %run_id);
        self.run_turns(run_id, transcript).instrument(span).await
    }

    async fn run_turns(&self, run_id: Uuid, transcript: &mut Transcript) -> Result<AgentRun> {
        let started_at = Utc::now();
        let mut tool_calls = Vec::new();

        for turn in 1..=self.max_turns {
            debug!("Agent turn {} of {}", turn, self.max_turns);

            let reply = self.request(transcript.messages()).await?;
            let parsed = parse_directive(&reply.content);
            transcript.push(Message::assistant(reply.content));

            let directive = match parsed {
                Parsed::Directive(directive) => directive,
                Parsed::NoDirective => {
                    info!("No action requested, finishing after {} turn(s)", turn);
                    return Ok(AgentRun::finish(
                        run_id,
                        StopReason::FinalAnswer,
                        turn,
                        tool_calls,
                        started_at,
                    ));
                }
                Parsed::Malformed { line } => {
                    warn!("Ignoring malformed action line: {:?}", line);
                    return Ok(AgentRun::finish(
                        run_id,
                        StopReason::FinalAnswer,
                        turn,
                        tool_calls,
                        started_at,
                    ));
                }
            };

            let record = self.dispatch(directive).await?;
            transcript.push(Message::user(format!(
                "{}{}",
                OBSERVATION_PREFIX, record.observation
            )));
            tool_calls.push(record);
        }

        info!("Turn limit of {} reached", self.max_turns);
        Ok(AgentRun::finish(
            run_id,
            StopReason::MaxTurns,
            self.max_turns,
            tool_calls,
            started_at,
        ))
    }

    async fn request(&self, messages: &[Message]) -> Result<Message> {
        let call = self.endpoint.complete(messages);
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                TenkeError::Transport(format!("Chat request timed out after {:?}", limit))
            })?,
            None => call.await,
        }
    }

    /// Run the tool named by `directive` and serialize its result.
    async fn dispatch(&self, directive: Directive) -> Result<ToolCallRecord> {
        let Directive {
            tool_name,
            argument,
        } = directive;

        let tool = match self.tools.get(&tool_name) {
            Some(tool) => tool,
            None => {
                warn!("Model requested unknown action {:?}", tool_name);
                return Err(TenkeError::UnknownTool(tool_name));
            }
        };

        info!("Agent calling tool: {} with argument: {}", tool_name, argument);

        let result = tool
            .call(&argument)
            .await
            .map_err(|e| TenkeError::ToolFailed {
                name: tool_name.clone(),
                reason: e.to_string(),
            })?;
        let observation = serde_json::to_string(&result)?;

        Ok(ToolCallRecord {
            name: tool_name,
            argument,
            observation,
        })
    }
}

/// Why a successful run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last reply requested no action; it is the final answer.
    FinalAnswer,
    /// Every turn requested an action and the turn limit was reached.
    MaxTurns,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::FinalAnswer => write!(f, "final answer"),
            StopReason::MaxTurns => write!(f, "turn limit reached"),
        }
    }
}

/// Summary of a completed run. The messages themselves live in the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    pub run_id: Uuid,
    pub stop: StopReason,
    /// Number of endpoint calls made.
    pub turns: usize,
    /// Tools invoked, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AgentRun {
    fn finish(
        run_id: Uuid,
        stop: StopReason,
        turns: usize,
        tool_calls: Vec<ToolCallRecord>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            stop,
            turns,
            tool_calls,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// Argument text passed to the tool.
    pub argument: String,
    /// JSON text of the result, as embedded in the observation.
    pub observation: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.argument)
    }
}
