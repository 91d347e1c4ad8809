//! Pre-flight checks before contacting a chat endpoint.
//!
//! Validates configuration up front so a run does not fail on its first
//! request for a reason that was knowable beforehand.

use crate::config::{EndpointProvider, Settings};
use crate::error::{Result, TenkeError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Talking to the configured endpoint (agent, ask).
    Chat,
    /// Serving relays to OpenAI regardless of the configured provider.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Chat => match settings.endpoint.provider {
            EndpointProvider::Worker => {
                settings.endpoint_url()?;
                if settings.endpoint.api_key_env.is_some() {
                    check_api_key(settings)?;
                }
            }
            EndpointProvider::OpenAI => check_api_key(settings)?,
        },
        Operation::Serve => {
            let mut relay = settings.clone();
            relay.endpoint.provider = EndpointProvider::OpenAI;
            check_api_key(&relay)?;
        }
    }
    Ok(())
}

/// Check that the configured API key variable is set and non-empty.
fn check_api_key(settings: &Settings) -> Result<()> {
    let Some(var) = settings.endpoint.key_var() else {
        return Ok(());
    };
    match std::env::var(&var) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(TenkeError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        Err(_) => Err(TenkeError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}
