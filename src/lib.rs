//! Tenke - Thought/Action/Observation tool loops
//!
//! A small library and CLI that lets a hosted chat model call local tools
//! through plain-text `Action:` lines.
//!
//! The name "Tenke" comes from the Norwegian word for "think."
//!
//! # Overview
//!
//! A run sends the conversation to a chat endpoint, looks for a line like
//! `Action: getCurrentWeather: Oslo` in the reply, runs the named tool and
//! appends its JSON result as an `Observation:` message. It stops when a
//! reply contains no action, or after a fixed number of turns.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `chat` - Messages, transcripts and chat endpoints (worker proxy, OpenAI)
//! - `agent` - Directive parsing, tool registry and the dispatch loop
//! - `cli` - Command-line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tenke::agent::{builtin_registry, Agent};
//! use tenke::chat::{Transcript, WorkerEndpoint};
//! use tenke::config::{Prompts, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let tools = builtin_registry(&settings.tools);
//!     let system = Prompts::default().agent_system(&tools.catalog());
//!
//!     let endpoint = Arc::new(WorkerEndpoint::new("http://127.0.0.1:3000/chat")?);
//!     let agent = Agent::new(endpoint, tools);
//!
//!     let mut transcript = Transcript::seed(system, "what are some activities to do this afternoon?");
//!     let run = agent.run(&mut transcript).await?;
//!     println!("{} after {} turns", run.stop, run.turns);
//!     if let Some(answer) = transcript.last_assistant() {
//!         println!("{}", answer.content);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;

pub use error::{Result, TenkeError};
