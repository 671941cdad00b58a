//! Azure OpenAI chat-completions client.
//!
//! Thin HTTP wrapper for `/openai/deployments/{deployment}/chat/completions`.
//! Generation parameters are fixed policy constants. Pure parsing lives in
//! `parse_completion_response` and `parse_error_message` for testability.
//!
//! Every call is bounded by the configured request deadline and can be
//! aborted early through the caller's cancellation receiver.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use super::config::CompletionConfig;
use super::types::{ChatCompletion, LlmError, Message, NO_RESPONSE_TEXT, Role};

pub const MAX_TOKENS: u32 = 800;
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.95;
pub const FREQUENCY_PENALTY: f32 = 0.0;
pub const PRESENCE_PENALTY: f32 = 0.0;

// =============================================================================
// CLIENT
// =============================================================================

pub struct AzureOpenAiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    deployment: String,
    deadline_secs: u64,
}

impl AzureOpenAiClient {
    /// Build a client for one deployment.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &CompletionConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            url: config.chat_completions_url(),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
            deadline_secs: config.timeouts.request_secs,
        })
    }

    /// Return the configured deployment name.
    #[must_use]
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    async fn send_json(&self, body: &impl Serialize) -> Result<String, LlmError> {
        let response = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            let status = status.as_u16();
            return Err(LlmError::ApiResponse { status, message: parse_error_message(status, &text) });
        }
        Ok(text)
    }

    async fn round_trip(&self, system: &str, messages: &[Message]) -> Result<String, LlmError> {
        let msgs = build_messages(system, messages);
        let body = CcRequest {
            messages: &msgs,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };
        let text = self.send_json(&body).await?;
        parse_completion_response(&text)
    }
}

#[async_trait::async_trait]
impl ChatCompletion for AzureOpenAiClient {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        mut cancel: watch::Receiver<bool>,
    ) -> Result<String, LlmError> {
        let deadline = Duration::from_secs(self.deadline_secs);
        tokio::select! {
            biased;
            () = cancelled(&mut cancel) => Err(LlmError::Cancelled),
            result = tokio::time::timeout(deadline, self.round_trip(system, messages)) => {
                result.unwrap_or(Err(LlmError::DeadlineExceeded { secs: self.deadline_secs }))
            }
        }
    }
}

/// Resolves once `cancel` reads `true`. Never resolves if the sender is gone.
pub(crate) async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let closed = cancel.wait_for(|flag| *flag).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    messages: &'a [CcMessage<'a>],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: Role,
    content: &'a str,
}

fn build_messages<'a>(system: &'a str, messages: &'a [Message]) -> Vec<CcMessage<'a>> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(CcMessage { role: Role::System, content: system });
    out.extend(
        messages
            .iter()
            .map(|m| CcMessage { role: m.role, content: &m.content }),
    );
    out
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Extract `choices[0].message.content`, or the no-response placeholder.
pub(crate) fn parse_completion_response(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let content = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());
    Ok(content.map_or_else(|| NO_RESPONSE_TEXT.to_string(), str::to_owned))
}

/// Best-effort server message from an error body.
pub(crate) fn parse_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|root| {
            root.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Azure AI API error: {status}"))
}

#[cfg(test)]
#[path = "azure_test.rs"]
mod tests;
