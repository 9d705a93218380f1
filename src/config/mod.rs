use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;

use crate::services::recipe_generator::{
    GeneratorSettings, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

/// Backends tried by default, highest priority first.
pub const DEFAULT_MODELS: &[&str] = &[
    "meta-llama/llama-3.3-70b-instruct:free",
    "deepseek/deepseek-chat-v3-0324:free",
    "google/gemini-2.0-flash-exp:free",
    "qwen/qwen-2.5-72b-instruct:free",
    "mistralai/mistral-7b-instruct:free",
];

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: i64 = 8080;
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TIMEOUT_SECONDS: i64 = 45;
const DEFAULT_REFERER: &str = "http://localhost:8080";
const DEFAULT_TITLE: &str = "Recipe Studio";

#[derive(Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Completion API key. Absence is tolerated: every request is then
    /// answered by the deterministic fallback recipe.
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    /// Comma separated override of [`DEFAULT_MODELS`].
    #[serde(default)]
    pub models: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub referer: String,
    pub title: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("models", &self.models)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and `APP_*` environment variables.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("openrouter_base_url", DEFAULT_BASE_URL)?
            .set_default("max_tokens", i64::from(DEFAULT_MAX_TOKENS))?
            .set_default("temperature", f64::from(DEFAULT_TEMPERATURE))?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECONDS)?
            .set_default("referer", DEFAULT_REFERER)?
            .set_default("title", DEFAULT_TITLE)?
            .add_source(config::Environment::with_prefix("APP"))
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Model priority list, falling back to the built-in list when the
    /// override is unset or empty.
    pub fn model_list(&self) -> Vec<String> {
        self.models
            .as_deref()
            .map(parse_model_list)
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect())
    }

    pub fn has_credential(&self) -> bool {
        self.openrouter_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            api_key: self.openrouter_api_key.clone(),
            models: self.model_list(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(models: Option<&str>, api_key: Option<&str>) -> Config {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: 8080,
            openrouter_api_key: api_key.map(String::from),
            openrouter_base_url: DEFAULT_BASE_URL.to_string(),
            models: models.map(String::from),
            max_tokens: 4000,
            temperature: 0.7,
            request_timeout_secs: 45,
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    #[test]
    fn test_model_override_is_split_and_trimmed() {
        let config = test_config(Some(" a/one , b/two,,c/three "), None);
        assert_eq!(config.model_list(), vec!["a/one", "b/two", "c/three"]);
    }

    #[test]
    fn test_empty_override_uses_defaults() {
        let config = test_config(Some(" , "), None);
        assert_eq!(config.model_list().len(), DEFAULT_MODELS.len());
        assert_eq!(config.model_list()[0], DEFAULT_MODELS[0]);
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        assert!(!test_config(None, Some("   ")).has_credential());
        assert!(!test_config(None, None).has_credential());
        assert!(test_config(None, Some("sk-test")).has_credential());
    }

    #[test]
    fn test_generator_settings_carry_sampling_parameters() {
        let settings = test_config(Some("x/y"), Some("sk-test")).generator_settings();
        assert_eq!(settings.models, vec!["x/y"]);
        assert_eq!(settings.max_tokens, 4000);
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_debug_output_redacts_credential() {
        let config = test_config(None, Some("sk-or-v1-secret"));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-or-v1-secret"));
        assert!(debug.contains("<redacted>"));

        let debug = format!("{:?}", config.generator_settings());
        assert!(!debug.contains("sk-or-v1-secret"));
    }
}
