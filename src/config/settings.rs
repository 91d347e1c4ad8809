//! Configuration settings for Tenke.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub endpoint: EndpointSettings,
    pub agent: AgentSettings,
    pub tools: ToolSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Which kind of chat endpoint to talk to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointProvider {
    /// A proxy that accepts a JSON array of messages and answers `{ "content": ... }`.
    #[default]
    Worker,
    /// The OpenAI chat completions API.
    OpenAI,
}

impl std::str::FromStr for EndpointProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "worker" | "proxy" => Ok(EndpointProvider::Worker),
            "openai" => Ok(EndpointProvider::OpenAI),
            _ => Err(format!("Unknown endpoint provider: {}", s)),
        }
    }
}

impl std::fmt::Display for EndpointProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointProvider::Worker => write!(f, "worker"),
            EndpointProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Chat endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Endpoint provider (worker, openai).
    pub provider: EndpointProvider,
    /// URL of the worker endpoint. Unused by the openai provider.
    pub url: String,
    /// Model name for the openai provider and `tenke serve`.
    pub model: String,
    /// Timeout for a single chat request.
    pub timeout_seconds: u64,
    /// Name of the environment variable holding the API key.
    ///
    /// Defaults to `OPENAI_API_KEY` for the openai provider; the worker
    /// provider sends no key unless this is set.
    pub api_key_env: Option<String>,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            provider: EndpointProvider::Worker,
            url: "http://127.0.0.1:3000/chat".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 300,
            api_key_env: None,
        }
    }
}

impl EndpointSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Name of the environment variable the API key is read from, if any.
    pub fn key_var(&self) -> Option<String> {
        match (&self.api_key_env, self.provider) {
            (Some(var), _) => Some(var.clone()),
            (None, EndpointProvider::OpenAI) => Some("OPENAI_API_KEY".to_string()),
            (None, EndpointProvider::Worker) => None,
        }
    }

    /// Read the API key from the environment. Empty values count as unset.
    pub fn api_key(&self) -> Option<String> {
        self.key_var()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }
}

/// Tool-dispatch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum number of chat turns per run.
    pub max_turns: usize,
    /// Task used when `tenke agent` is run without one.
    pub default_task: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_turns: crate::agent::DEFAULT_MAX_TURNS,
            default_task: "what are some activities to do this afternoon?".to_string(),
        }
    }
}

/// Values reported by the built-in tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Location returned by `getLocation`.
    pub location: String,
    /// Temperature reported by `getCurrentWeather`.
    pub temperature: String,
    /// Temperature unit reported by `getCurrentWeather`.
    pub unit: String,
    /// Forecast reported by `getCurrentWeather`.
    pub forecast: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            location: "Salt Lake City, UT".to_string(),
            temperature: "72".to_string(),
            unit: "F".to_string(),
            forecast: "sunny".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TenkeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tenke")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded custom prompts directory, if configured.
    pub fn prompts_dir(&self) -> Option<PathBuf> {
        self.prompts.custom_dir.as_deref().map(Self::expand_path)
    }

    /// Parse and validate the worker endpoint URL.
    pub fn endpoint_url(&self) -> crate::error::Result<url::Url> {
        let url = url::Url::parse(&self.endpoint.url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(crate::error::TenkeError::Config(format!(
                "endpoint.url must be http or https, got '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.agent.max_turns, 5);
        assert_eq!(settings.endpoint.provider, EndpointProvider::Worker);
        assert_eq!(settings.tools.location, "Salt Lake City, UT");
        assert_eq!(settings.endpoint.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [endpoint]
            provider = "openai"
            model = "gpt-4.1"

            [agent]
            max_turns = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.endpoint.provider, EndpointProvider::OpenAI);
        assert_eq!(settings.endpoint.model, "gpt-4.1");
        assert_eq!(settings.endpoint.timeout_seconds, 300);
        assert_eq!(settings.agent.max_turns, 3);
        assert_eq!(settings.tools.forecast, "sunny");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.agent.max_turns = 7;
        settings.tools.location = "Bergen, NO".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.agent.max_turns, 7);
        assert_eq!(loaded.tools.location, "Bergen, NO");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.agent.max_turns, 5);
    }

    #[test]
    fn test_key_var_per_provider() {
        let mut endpoint = EndpointSettings::default();
        assert_eq!(endpoint.key_var(), None);

        endpoint.provider = EndpointProvider::OpenAI;
        assert_eq!(endpoint.key_var().as_deref(), Some("OPENAI_API_KEY"));

        endpoint.api_key_env = Some("WORKER_TOKEN".to_string());
        assert_eq!(endpoint.key_var().as_deref(), Some("WORKER_TOKEN"));
    }

    #[test]
    fn test_endpoint_url_validation() {
        let mut settings = Settings::default();
        assert!(settings.endpoint_url().is_ok());

        settings.endpoint.url = "ftp://example.com/chat".to_string();
        assert!(settings.endpoint_url().is_err());

        settings.endpoint.url = "not a url".to_string();
        assert!(settings.endpoint_url().is_err());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<EndpointProvider>(), Ok(EndpointProvider::OpenAI));
        assert_eq!("proxy".parse::<EndpointProvider>(), Ok(EndpointProvider::Worker));
        assert!("bedrock".parse::<EndpointProvider>().is_err());
    }
}
