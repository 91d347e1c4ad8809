//! Prompt templates for Tenke.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("Invalid placeholder regex"))
}

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    pub ask: AskPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the tool-dispatch loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    /// System prompt. `{{tools}}` is replaced with the tool catalog.
    pub system: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You cycle through Thought, Action, PAUSE, Observation. At the end of the loop you output a final Answer. Your final answer should be highly specific to the observations you have from running the actions.
1. Thought: Describe your thoughts about the question you have been asked.
2. Action: run one of the actions available to you - then return PAUSE.
3. PAUSE
4. Observation: will be the result of running those actions.

Available actions:
{{tools}}

Example session:
Question: Please give me some ideas for activities to do this afternoon.
Thought: I should look up the user's location so I can give location-specific activity ideas.
Action: getLocation: null
PAUSE

You will be called again with something like this:
Observation: "New York City, NY"

Then you loop again:
Thought: To get even more specific activity ideas, I should get the current weather at the user's location.
Action: getCurrentWeather: New York City
PAUSE

You'll then be called again with something like this:
Observation: {"location":"New York City, NY","forecast":"sunny"}

You then output:
Answer: <Suggested activities based on sunny weather that are highly specific to New York City and surrounding areas.>"#
                .to_string(),
        }
    }
}

/// Prompts for one-shot questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AskPrompts {
    pub system: String,
}

impl Default for AskPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful assistant. Answer concisely and say so when you are unsure."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&Path>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let agent_path = dir.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }

            let ask_path = dir.join("ask.toml");
            if ask_path.exists() {
                let content = std::fs::read_to_string(&ask_path)?;
                prompts.ask = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Load prompts as configured in [`Settings`](super::Settings).
    pub fn from_settings(settings: &super::Settings) -> crate::error::Result<Self> {
        Self::load(
            settings.prompts_dir().as_deref(),
            Some(&settings.prompts.variables),
        )
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are substituted in one pass over the template, so a
    /// `{{name}}` appearing inside a substituted value is left as written.
    /// Unknown placeholders are kept verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        placeholder_regex()
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Agent system prompt with the tool catalog filled in.
    pub fn agent_system(&self, catalog: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("tools".to_string(), catalog.trim_end().to_string());
        self.render_with_custom(&self.agent.system, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.agent.system.contains("{{tools}}"));
        assert!(!prompts.ask.system.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let mut vars = HashMap::new();
        vars.insert("a".to_string(), "{{b}}".to_string());
        vars.insert("b".to_string(), "{{a}}".to_string());
        vars.insert("c".to_string(), "{{b}}".to_string());

        for _ in 0..8 {
            assert_eq!(
                Prompts::render("{{a}} {{b}} {{c}} {{missing}}", &vars),
                "{{b}} {{a}} {{b}} {{missing}}"
            );
        }
    }

    #[test]
    fn test_catalog_text_is_not_rescanned() {
        let mut prompts = Prompts::default();
        prompts.agent.system = "{{tools}}".to_string();
        prompts
            .variables
            .insert("persona".to_string(), "Guide".to_string());

        assert_eq!(prompts.agent_system("- echo: {{persona}}"), "- echo: {{persona}}");
    }

    #[test]
    fn test_agent_system_fills_catalog() {
        let prompts = Prompts::default();
        let system = prompts.agent_system("- getLocation:\n    Returns a place.\n");
        assert!(system.contains("Available actions:\n- getLocation:\n    Returns a place.\n\nExample session:"));
        assert!(!system.contains("{{tools}}"));
    }

    #[test]
    fn test_custom_variables_do_not_override_catalog() {
        let mut prompts = Prompts::default();
        prompts.agent.system = "{{persona}} / {{tools}}".to_string();
        prompts
            .variables
            .insert("persona".to_string(), "Guide".to_string());
        prompts
            .variables
            .insert("tools".to_string(), "stale".to_string());

        assert_eq!(prompts.agent_system("fresh"), "Guide / fresh");
    }

    #[test]
    fn test_load_custom_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ask.toml"),
            "system = \"You are a trading guru.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(Some(dir.path()), None).unwrap();
        assert_eq!(prompts.ask.system, "You are a trading guru.");
        assert!(prompts.agent.system.contains("{{tools}}"));
    }
}
