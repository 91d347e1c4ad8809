//! Doctor command - verify configuration and endpoint requirements.

use crate::agent::builtin_registry;
use crate::cli::Output;
use crate::config::{EndpointProvider, Prompts, Settings};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(config_path: &Path, settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tenke Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let group = vec![check_config_file(config_path), check_prompts(settings)];
    print_group(&group);
    checks.extend(group);

    println!("{}", style("Endpoint").bold());
    let group = check_endpoint(settings);
    print_group(&group);
    checks.extend(group);

    println!("{}", style("Tools").bold());
    let group = vec![check_tools(settings)];
    print_group(&group);
    checks.extend(group);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Tenke.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("{} warning(s). Tenke should still work.", warnings));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

fn print_group(group: &[CheckResult]) {
    for check in group {
        check.print();
    }
    println!();
}

fn check_config_file(path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::warning(
            "Config file",
            &format!("{} not found, using defaults", path.display()),
            "Run 'tenke config edit' to create one",
        );
    }
    match Settings::load_from(Some(&path.to_path_buf())) {
        Ok(_) => CheckResult::ok("Config file", &path.display().to_string()),
        Err(e) => CheckResult::error("Config file", &e.to_string(), "Fix the TOML syntax"),
    }
}

fn check_prompts(settings: &Settings) -> CheckResult {
    match Prompts::from_settings(settings) {
        Ok(_) => match settings.prompts_dir() {
            Some(dir) => CheckResult::ok("Prompts", &format!("custom prompts from {}", dir.display())),
            None => CheckResult::ok("Prompts", "built-in prompts"),
        },
        Err(e) => CheckResult::error(
            "Prompts",
            &e.to_string(),
            "Check agent.toml and ask.toml in prompts.custom_dir",
        ),
    }
}

fn check_endpoint(settings: &Settings) -> Vec<CheckResult> {
    let endpoint = &settings.endpoint;
    let mut checks = vec![CheckResult::ok(
        "Provider",
        &format!("{} (timeout {}s)", endpoint.provider, endpoint.timeout_seconds),
    )];

    match endpoint.provider {
        EndpointProvider::Worker => match settings.endpoint_url() {
            Ok(url) => checks.push(CheckResult::ok("URL", url.as_str())),
            Err(e) => checks.push(CheckResult::error(
                "URL",
                &e.to_string(),
                "Set endpoint.url to an http(s) URL",
            )),
        },
        EndpointProvider::OpenAI => checks.push(CheckResult::ok("Model", &endpoint.model)),
    }

    match endpoint.key_var() {
        None => checks.push(CheckResult::ok("API key", "not required")),
        Some(var) if endpoint.api_key().is_some() => {
            checks.push(CheckResult::ok("API key", &format!("{} is set", var)))
        }
        Some(var) => checks.push(CheckResult::error(
            "API key",
            &format!("{} is not set", var),
            &format!("export {}='...'", var),
        )),
    }

    checks
}

fn check_tools(settings: &Settings) -> CheckResult {
    let registry = builtin_registry(&settings.tools);
    let names = registry.names().collect::<Vec<_>>().join(", ");
    CheckResult::ok("Registered", &names)
}
