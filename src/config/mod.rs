//! Configuration module for Tenke.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, AskPrompts, Prompts};
pub use settings::{
    AgentSettings, EndpointProvider, EndpointSettings, GeneralSettings, PromptSettings, Settings,
    ToolSettings,
};
