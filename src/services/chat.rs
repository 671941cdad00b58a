//! Chat dispatcher: resolves one user turn against the completion client
//! and its fallbacks.
//!
//! DESIGN
//! ======
//! A turn is two-phase. The user message is appended and `is_loading` set
//! under the conversation lock; the lock is then released while context is
//! assembled and the network is consulted; the reply is appended under the
//! lock again.
//!
//! Resolution order:
//! 1. Completion client configured: prompt it with persona + digest +
//!    history. A failure ends the turn as `Failed` unless the policy is
//!    [`FallbackPolicy::AnyFailure`]. Cancellation always ends it as `Failed`.
//! 2. Otherwise the store's agent endpoint gets the full history.
//! 3. If the agent fails too, the digest itself is wrapped into a reply.
//!
//! Steps 2 and 3 never fail, so a turn always ends with an assistant message.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};
use uuid::Uuid;

use super::context::{self, ContextDigest};
use super::conversation::{ChatMessage, Conversation};
use crate::error::ErrorCode;
use crate::llm::types::{ChatCompletion, LlmError, Message};
use crate::store::{AgentChat, StoreData};

pub const SYSTEM_PERSONA: &str = "You are a helpful AI assistant for StoreAI, a grocery management platform. \
Help store managers with inventory, workforce, pricing, loss prevention, and product placement questions. \
Be concise and actionable.\n\n\
You have access to real-time database information. When answering questions, reference the provided data \
context when relevant.";

pub const FAILURE_NOTICE: &str = "Failed to get AI response. Please check your Azure AI configuration.";

pub const APOLOGY_REPLY: &str = "I apologize, but I'm having trouble connecting to the AI service. \
Please ensure your Azure AI credentials are properly configured.";

pub const ENV_FALLBACK_POLICY: &str = "CHAT_FALLBACK_POLICY";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a reply is already in progress")]
    TurnInFlight,
    #[error("chat session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("unknown fallback policy: {0}")]
    InvalidPolicy(String),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "E_EMPTY_MESSAGE",
            Self::TurnInFlight => "E_TURN_IN_FLIGHT",
            Self::SessionNotFound(_) => "E_SESSION_NOT_FOUND",
            Self::InvalidPolicy(_) => "E_INVALID_POLICY",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::TurnInFlight)
    }
}

/// When the secondary path may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Only when no completion client is configured. Completion errors fail the turn.
    #[default]
    MissingConfigOnly,
    /// Also when a configured completion call fails.
    AnyFailure,
}

impl FromStr for FallbackPolicy {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "missing_config_only" => Ok(Self::MissingConfigOnly),
            "any_failure" => Ok(Self::AnyFailure),
            other => Err(ChatError::InvalidPolicy(other.to_string())),
        }
    }
}

impl FallbackPolicy {
    /// Read `CHAT_FALLBACK_POLICY`; unset or blank means the default.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidPolicy`] for an unrecognized value.
    pub fn from_env() -> Result<Self, ChatError> {
        match std::env::var(ENV_FALLBACK_POLICY) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse(),
            _ => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOutcome {
    Succeeded,
    Degraded,
    Failed,
}

/// Reply text chosen for a turn, before it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: TurnOutcome,
    pub text: String,
    pub notice: Option<String>,
}

impl Resolution {
    fn succeeded(text: String) -> Self {
        Self { outcome: TurnOutcome::Succeeded, text, notice: None }
    }

    fn degraded(text: String) -> Self {
        Self { outcome: TurnOutcome::Degraded, text, notice: None }
    }

    fn failed() -> Self {
        Self { outcome: TurnOutcome::Failed, text: APOLOGY_REPLY.into(), notice: Some(FAILURE_NOTICE.into()) }
    }
}

/// Result of one completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub reply: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

// =============================================================================
// DISPATCHER
// =============================================================================

pub struct ChatDispatcher {
    completion: Option<Arc<dyn ChatCompletion>>,
    store: Arc<dyn StoreData>,
    agent: Arc<dyn AgentChat>,
    policy: FallbackPolicy,
}

impl ChatDispatcher {
    #[must_use]
    pub fn new(
        completion: Option<Arc<dyn ChatCompletion>>,
        store: Arc<dyn StoreData>,
        agent: Arc<dyn AgentChat>,
        policy: FallbackPolicy,
    ) -> Self {
        Self { completion, store, agent, policy }
    }

    #[must_use]
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    #[must_use]
    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Run one turn against `conversation`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EmptyMessage`] or [`ChatError::TurnInFlight`]
    /// when the turn cannot start. Once started, a turn always produces a
    /// [`TurnReport`].
    pub async fn send(
        &self,
        conversation: &Mutex<Conversation>,
        input: &str,
        cancel: watch::Receiver<bool>,
    ) -> Result<TurnReport, ChatError> {
        let (user_message, history) = {
            let mut conv = conversation.lock().await;
            let message = conv.begin_turn(input)?;
            (message, conv.history())
        };

        let resolution = self.resolve(&history, &user_message.content, cancel).await;
        if let Some(notice) = &resolution.notice {
            warn!(notice = %notice, "chat: turn failed");
        }

        let reply = conversation.lock().await.finish_turn(resolution.text);
        info!(outcome = ?resolution.outcome, reply_len = reply.content.len(), "chat: turn complete");
        Ok(TurnReport { outcome: resolution.outcome, reply, notice: resolution.notice })
    }

    /// Choose the reply for `user_message` given the history that already
    /// ends with it.
    pub async fn resolve(&self, history: &[Message], user_message: &str, cancel: watch::Receiver<bool>) -> Resolution {
        let Some(client) = &self.completion else {
            info!("chat: completion client not configured; using agent fallback");
            return self.secondary(history, user_message, None).await;
        };

        let digest = context::assemble(self.store.as_ref(), user_message).await;
        let system = build_system_prompt(&digest);
        match client.complete(&system, history, cancel).await {
            Ok(text) => Resolution::succeeded(text),
            // A cancelled turn belongs to a closed session; nobody reads a fallback reply.
            Err(LlmError::Cancelled) => {
                info!("chat: completion cancelled");
                Resolution::failed()
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "chat: completion failed");
                match self.policy {
                    FallbackPolicy::MissingConfigOnly => Resolution::failed(),
                    FallbackPolicy::AnyFailure => self.secondary(history, user_message, Some(digest)).await,
                }
            }
        }
    }

    async fn secondary(&self, history: &[Message], user_message: &str, digest: Option<ContextDigest>) -> Resolution {
        match self.agent.chat(history).await {
            Ok(reply) => Resolution::degraded(reply.response),
            Err(e) => {
                warn!(error = %e, "chat: agent endpoint failed; replying with raw context");
                let digest = match digest {
                    Some(digest) => digest,
                    None => context::assemble(self.store.as_ref(), user_message).await,
                };
                Resolution::degraded(degraded_reply(user_message, &digest))
            }
        }
    }
}

/// Persona plus the per-turn digest.
#[must_use]
pub fn build_system_prompt(digest: &ContextDigest) -> String {
    format!("{SYSTEM_PERSONA}\n\nDatabase Context:\n{digest}")
}

/// Reply used when neither the completion client nor the agent answered.
#[must_use]
pub fn degraded_reply(user_message: &str, digest: &ContextDigest) -> String {
    format!(
        "I understand you're asking about: \"{user_message}\"\n\n\
         Here's what I found in the database:\n{digest}\n\n\
         Note: Full AI responses require Azure OpenAI configuration."
    )
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
