//! Gemini configuration

use mgpt_core::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/text-embedding-004";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Gemini client
#[derive(Clone, Serialize)]
pub struct GeminiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub api_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Create configuration from any key/value source.
    ///
    /// `GOOGLE_API_KEY` is required; everything else falls back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration(
                    "Missing API key. Set GOOGLE_API_KEY in the environment or a .env file".to_string(),
                )
            })?;

        let api_url = lookup("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url)
            .map_err(|e| Error::Configuration(format!("Invalid GEMINI_API_URL '{}': {}", api_url, e)))?;

        let chat_model =
            lookup("GEMINI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let embedding_model =
            lookup("GEMINI_EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());

        let temperature = match lookup("GEMINI_TEMPERATURE") {
            Some(raw) => raw.trim().parse::<f32>().map_err(|_| {
                Error::Configuration(format!("GEMINI_TEMPERATURE must be a number, got '{}'", raw))
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            chat_model,
            embedding_model,
            temperature,
            timeout_secs,
        })
    }

    /// Create configuration with an explicit key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(Error::Configuration(format!(
            "GEMINI_TIMEOUT_SECS must be a positive whole number of seconds, got '{}'",
            raw
        ))),
    }
}
