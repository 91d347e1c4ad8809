//! Agent command implementation.

use crate::agent::{builtin_registry, Agent};
use crate::chat::{endpoint_from_settings, Role, Transcript};
use crate::cli::output::truncate;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::error::TenkeError;
use anyhow::Result;

/// Run the agent command.
pub async fn run_agent(
    task: Option<String>,
    max_turns: Option<usize>,
    show_system: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Chat, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tenke doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let endpoint = endpoint_from_settings(&settings.endpoint)?;
    let tools = builtin_registry(&settings.tools);
    let prompts = Prompts::from_settings(&settings)?;

    let system = prompts.agent_system(&tools.catalog());
    let task = task.unwrap_or_else(|| settings.agent.default_task.clone());
    let mut transcript = Transcript::seed(system, task);

    let agent = Agent::new(endpoint, tools)
        .with_max_turns(max_turns.unwrap_or(settings.agent.max_turns))
        .with_request_timeout(settings.endpoint.timeout());

    let spinner = Output::spinner("Agent working...");
    let result = agent.run(&mut transcript).await;
    spinner.finish_and_clear();

    print_transcript(&transcript, show_system);
    println!();

    match result {
        Ok(run) => {
            if !run.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", run.tool_calls.len()));
                for call in &run.tool_calls {
                    Output::list_item(&format!(
                        "{} -> {}",
                        call,
                        truncate(&call.observation, 60)
                    ));
                }
                println!();
            }

            Output::info(&format!(
                "Stopped ({}) after {} turn(s) in {} ms",
                run.stop,
                run.turns,
                run.elapsed().num_milliseconds()
            ));
            Ok(())
        }
        Err(e) => {
            match &e {
                TenkeError::UnknownTool(_) => Output::error(&e.to_string()),
                _ => Output::error(&format!("Agent failed: {}", e)),
            }
            Err(e.into())
        }
    }
}

fn print_transcript(transcript: &Transcript, show_system: bool) {
    for message in transcript {
        let collapse = message.role == Role::System && !show_system;
        Output::message(message, collapse);
    }
}
