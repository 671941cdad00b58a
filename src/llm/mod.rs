//! LLM: chat-completion adapter for the store assistant.
//!
//! DESIGN
//! ======
//! One provider: an Azure OpenAI chat-completions deployment. Configuration
//! comes from environment variables and is either fully present or absent.
//! Absence is not an error for [`from_env_optional`]: `main` holds no client
//! and the chat dispatcher takes its secondary path. A present but malformed
//! configuration is still an error.

pub mod azure;
pub mod config;
pub mod types;

use std::sync::Arc;

pub use azure::AzureOpenAiClient;
pub use config::CompletionConfig;
pub use types::{ChatCompletion, LlmError, Message, Role};

/// Build a completion client from environment variables.
///
/// # Errors
///
/// Returns [`LlmError::MissingConfig`] when any required variable is unset
/// or blank, or a parse/build error when the values are unusable.
pub fn from_env() -> Result<Arc<dyn ChatCompletion>, LlmError> {
    let config = CompletionConfig::from_env()?;
    let client = AzureOpenAiClient::new(&config)?;
    tracing::info!(deployment = client.deployment(), "completion client initialized");
    Ok(Arc::new(client))
}

/// Like [`from_env`], but absent configuration yields `None`.
///
/// # Errors
///
/// Any error other than [`LlmError::MissingConfig`]: a malformed timeout or
/// an HTTP client that cannot be built is a broken deployment, not a missing
/// one.
pub fn from_env_optional() -> Result<Option<Arc<dyn ChatCompletion>>, LlmError> {
    match from_env() {
        Ok(client) => Ok(Some(client)),
        Err(LlmError::MissingConfig { var }) => {
            tracing::info!(%var, "completion client not configured; chat runs in fallback mode");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
