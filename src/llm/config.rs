//! Completion configuration parsed from environment variables.
//!
//! The four connection fields are required together. If any one is missing
//! or blank the whole configuration is absent and the dispatcher runs
//! without a completion client.

use super::types::LlmError;

pub const DEFAULT_API_VERSION: &str = "2024-08-01-preview";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeouts: LlmTimeouts,
}

impl CompletionConfig {
    /// Build a config from explicit values with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingConfig`] naming the first blank field.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: normalize_endpoint(&require(endpoint.into(), "endpoint")?),
            api_key: require(api_key.into(), "api_key")?,
            deployment: require(deployment.into(), "deployment")?,
            api_version: require(api_version.into(), "api_version")?,
            timeouts: LlmTimeouts::default(),
        })
    }

    /// Build typed completion config from environment variables.
    ///
    /// Required:
    /// - `AZURE_OPENAI_ENDPOINT`
    /// - `AZURE_OPENAI_API_KEY`
    /// - `AZURE_OPENAI_DEPLOYMENT`
    ///
    /// Optional:
    /// - `AZURE_OPENAI_API_VERSION`: default `2024-08-01-preview`; set but
    ///   blank counts as missing
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 60
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingConfig`] naming the first unset or blank
    /// required variable, or [`LlmError::ConfigParse`] when a timeout is not
    /// a whole number of seconds.
    pub fn from_env() -> Result<Self, LlmError> {
        let endpoint = require(env_or_empty(ENV_ENDPOINT), ENV_ENDPOINT)?;
        let api_key = require(env_or_empty(ENV_API_KEY), ENV_API_KEY)?;
        let deployment = require(env_or_empty(ENV_DEPLOYMENT), ENV_DEPLOYMENT)?;
        let api_version = match std::env::var(ENV_API_VERSION) {
            Ok(raw) => require(raw, ENV_API_VERSION)?,
            Err(_) => DEFAULT_API_VERSION.to_string(),
        };
        let timeouts = LlmTimeouts {
            request_secs: env_parse_u64("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { endpoint: normalize_endpoint(&endpoint), api_key, deployment, api_version, timeouts })
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: LlmTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Full chat-completions URL for this deployment.
    #[must_use]
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

fn require(value: String, name: &str) -> Result<String, LlmError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LlmError::MissingConfig { var: name.to_string() });
    }
    Ok(trimmed.to_string())
}

fn normalize_endpoint(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

fn env_parse_u64(key: &str, default: u64) -> Result<u64, LlmError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| LlmError::ConfigParse(format!("{key} must be a whole number of seconds, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
