//! CLI module for Tenke.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tenke - Thought/Action/Observation tool loops
///
/// Runs a small reasoning loop against a chat endpoint, letting the model call
/// local tools. The name "Tenke" comes from the Norwegian word for "think."
#[derive(Parser, Debug)]
#[command(name = "tenke")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TENKE_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tool-dispatch loop on a task
    Agent {
        /// The task for the agent (defaults to agent.default_task)
        task: Option<String>,

        /// Maximum number of chat turns
        #[arg(short, long)]
        max_turns: Option<usize>,

        /// Print the full system prompt in the transcript
        #[arg(long)]
        show_system: bool,
    },

    /// Ask a single question without tools
    Ask {
        /// The question to ask
        question: String,

        /// Override the system prompt
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Start an HTTP server exposing the chat and agent endpoints
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check configuration and endpoint requirements
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
