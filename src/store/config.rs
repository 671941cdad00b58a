//! Store data API configuration parsed from environment variables.

use super::types::StoreApiError;

pub const DEFAULT_STORE_API_TIMEOUT_SECS: u64 = 15;

/// Deployments ship with this placeholder host until the real API is wired up.
const PLACEHOLDER_ENDPOINT: &str = "your-api-endpoint";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub mock_fallback: bool,
    pub timeout_secs: u64,
}

impl Default for StoreApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            mock_fallback: true,
            timeout_secs: DEFAULT_STORE_API_TIMEOUT_SECS,
        }
    }
}

impl StoreApiConfig {
    /// Build store API config from environment variables.
    ///
    /// - `STORE_API_ENDPOINT`: base URL, paths are appended verbatim
    /// - `STORE_API_KEY`: sent as `x-api-key`
    /// - `STORE_API_MOCK_FALLBACK`: `true` (default) or `false`
    /// - `STORE_API_TIMEOUT_SECS`: default 15
    ///
    /// # Errors
    ///
    /// Returns [`StoreApiError::Config`] if a flag or timeout is malformed.
    pub fn from_env() -> Result<Self, StoreApiError> {
        let mock_fallback = match std::env::var("STORE_API_MOCK_FALLBACK") {
            Ok(raw) => parse_flag(&raw)
                .ok_or_else(|| StoreApiError::Config(format!("STORE_API_MOCK_FALLBACK must be true or false, got '{raw}'")))?,
            Err(_) => true,
        };
        let timeout_secs = match std::env::var("STORE_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| StoreApiError::Config(format!("STORE_API_TIMEOUT_SECS must be a whole number, got '{raw}'")))?,
            Err(_) => DEFAULT_STORE_API_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint: std::env::var("STORE_API_ENDPOINT").unwrap_or_default().trim().to_string(),
            api_key: std::env::var("STORE_API_KEY").unwrap_or_default().trim().to_string(),
            mock_fallback,
            timeout_secs,
        })
    }

    /// Base URL when the API is usable, `None` when it should be mocked.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        if self.endpoint.is_empty() || self.api_key.is_empty() || self.endpoint.contains(PLACEHOLDER_ENDPOINT) {
            return None;
        }
        Some(self.endpoint.trim_end_matches('/'))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
