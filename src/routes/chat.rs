//! Chat session routes.
//!
//! A turn runs on its own task so a dropped HTTP connection cannot strand
//! the conversation with `is_loading` set; only closing the session
//! cancels it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::RouteError;
use crate::services::chat::TurnOutcome;
use crate::services::conversation::{ChatMessage, Conversation};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
    pub pending_input: String,
}

fn to_response(id: Uuid, conv: &Conversation) -> SessionResponse {
    SessionResponse {
        id,
        messages: conv.messages().to_vec(),
        is_loading: conv.is_loading(),
        pending_input: conv.pending_input().to_string(),
    }
}

#[derive(Deserialize)]
pub struct ContentBody {
    pub content: String,
}

#[derive(Serialize)]
pub struct SendResponse {
    pub outcome: TurnOutcome,
    pub reply: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub messages: Vec<ChatMessage>,
}

/// `POST /api/chat/sessions`: open a session seeded with the greeting.
pub async fn open_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let (id, session) = state.open_session().await;
    info!(session_id = %id, "chat: session opened");
    let conv = session.conversation.lock().await;
    (StatusCode::CREATED, Json(to_response(id, &conv)))
}

/// `GET /api/chat/sessions/:id`: transcript and loading flag.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, RouteError> {
    let session = state.session(id).await?;
    let conv = session.conversation.lock().await;
    Ok(Json(to_response(id, &conv)))
}

/// `DELETE /api/chat/sessions/:id`: discard the session.
pub async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, RouteError> {
    state.close_session(id).await?;
    info!(session_id = %id, "chat: session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/chat/sessions/:id/draft`: store the unsent input.
pub async fn set_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ContentBody>,
) -> Result<StatusCode, RouteError> {
    let session = state.session(id).await?;
    session.conversation.lock().await.set_pending_input(body.content);
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/chat/sessions/:id/messages`: run one turn.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ContentBody>,
) -> Result<Json<SendResponse>, RouteError> {
    let session = state.session(id).await?;
    let cancel = session.cancel_receiver();
    let chat = state.chat.clone();
    let turn_session = session.clone();

    let report = tokio::spawn(async move { chat.send(&turn_session.conversation, &body.content, cancel).await })
        .await
        .map_err(|e| RouteError::Internal(e.to_string()))??;
    session.touch();

    info!(session_id = %id, outcome = ?report.outcome, "chat: message handled");
    let messages = session.conversation.lock().await.messages().to_vec();
    Ok(Json(SendResponse { outcome: report.outcome, reply: report.reply, notice: report.notice, messages }))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
