//! Error types for Tenke.

use thiserror::Error;

/// Library-level error type for Tenke operations.
#[derive(Error, Debug)]
pub enum TenkeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat endpoint transport failed: {0}")]
    Transport(String),

    #[error("Unknown action \"{0}\"")]
    UnknownTool(String),

    #[error("Tool \"{name}\" failed: {reason}")]
    ToolFailed { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TenkeError {
    /// Short machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TenkeError::Config(_) => "config",
            TenkeError::Transport(_) | TenkeError::Http(_) => "transport",
            TenkeError::UnknownTool(_) => "unknown_tool",
            TenkeError::ToolFailed { .. } => "tool_failed",
            TenkeError::Io(_) => "io",
            TenkeError::Json(_) => "json",
            TenkeError::TomlParse(_) => "config",
            TenkeError::Url(_) => "config",
            TenkeError::OpenAI(_) => "openai",
            TenkeError::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Result type alias for Tenke operations.
pub type Result<T> = std::result::Result<T, TenkeError>;
