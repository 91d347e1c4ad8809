//! Tool-dispatch loop.
//!
//! The model is prompted to answer in Thought/Action/PAUSE steps. Each
//! `Action: <tool>: <argument>` line is dispatched to a registered tool and
//! the result is fed back as an `Observation:` message until the model
//! stops asking for actions or the turn limit is reached.

mod builtin;
mod directive;
mod runner;
mod tools;

pub use builtin::{
    builtin_registry, GetCurrentWeather, GetLocation, WeatherReport, GET_CURRENT_WEATHER,
    GET_LOCATION,
};
pub use directive::{parse_directive, Directive, Parsed, DIRECTIVE_PATTERN};
pub use runner::{
    Agent, AgentRun, StopReason, ToolCallRecord, DEFAULT_MAX_TURNS, OBSERVATION_PREFIX,
};
pub use tools::{FnTool, Tool, ToolRegistry, ToolRegistryBuilder};
