//! LLM types: chat roles, prompt messages, errors, and the completion trait.
//!
//! Provider-neutral types shared by the Azure client, the dispatcher, and
//! the agent fallback endpoint (which speaks the same `{role, content}` shape).

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Literal reply used when a successful response carries no usable choice.
pub const NO_RESPONSE_TEXT: &str = "No response from AI";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by completion client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A required configuration value is missing or empty.
    #[error("missing completion config: {var} not set")]
    MissingConfig { var: String },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP request to the completion endpoint failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The completion endpoint returned a non-success HTTP status.
    #[error("API response error: status {status}: {message}")]
    ApiResponse { status: u16, message: String },

    /// The completion response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The call did not finish before its deadline.
    #[error("completion deadline exceeded after {secs}s")]
    DeadlineExceeded { secs: u64 },

    /// The caller cancelled the call while it was in flight.
    #[error("completion cancelled")]
    Cancelled,
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingConfig { .. } => "E_MISSING_CONFIG",
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::DeadlineExceeded { .. } => "E_DEADLINE_EXCEEDED",
            Self::Cancelled => "E_CANCELLED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::DeadlineExceeded { .. } | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single `{role, content}` pair as sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

// =============================================================================
// COMPLETION TRAIT
// =============================================================================

/// Provider-neutral async trait for one chat-completion round trip.
/// Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the system prompt plus ordered history and return the reply text.
    ///
    /// Flipping `cancel` to `true` aborts the call with [`LlmError::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the endpoint answers
    /// with a non-2xx status, the deadline passes, or the call is cancelled.
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        cancel: watch::Receiver<bool>,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
