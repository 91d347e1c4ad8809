//! Ask command implementation.

use crate::chat::{ask, endpoint_from_settings};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, system: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Chat, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tenke doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let endpoint = endpoint_from_settings(&settings.endpoint)?;
    let system = match system {
        Some(system) => system,
        None => Prompts::from_settings(&settings)?.ask.system,
    };

    let spinner = Output::spinner("Thinking...");

    match ask(endpoint.as_ref(), &system, question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", answer);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to get an answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
