//! CLI command implementations.

mod agent;
mod ask;
mod config;
mod doctor;
mod serve;

pub use agent::run_agent;
pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use serve::run_serve;
