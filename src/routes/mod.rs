//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the chat session endpoints and the read-only dashboard endpoints
//! under a single Axum router. Handlers return [`RouteError`], which renders
//! as a JSON `{code, message, retryable}` body.

pub mod chat;
pub mod dashboard;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorCode;
use crate::services::chat::ChatError;
use crate::state::AppState;
use crate::store::StoreApiError;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat/sessions", post(chat::open_session))
        .route(
            "/api/chat/sessions/{id}",
            get(chat::get_session).delete(chat::close_session),
        )
        .route("/api/chat/sessions/{id}/draft", put(chat::set_draft))
        .route("/api/chat/sessions/{id}/messages", post(chat::send_message))
        .route("/api/store", get(dashboard::store_info))
        .route("/api/inventory", get(dashboard::inventory))
        .route("/api/forecast/demand", get(dashboard::demand_forecasts))
        .route("/api/workforce/shifts", get(dashboard::shifts))
        .route("/api/workforce/forecast", get(dashboard::hourly_forecast))
        .route("/api/pricing/recommendations", get(dashboard::pricing_recommendations))
        .route("/api/placement/recommendations", get(dashboard::placement_recommendations))
        .route("/api/loss-prevention/events", get(dashboard::shrinkage_events))
        .route("/api/metrics/operational", get(dashboard::operational_metrics))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Store(#[from] StoreApiError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorCode for RouteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Chat(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Chat(e) => e.retryable(),
            Self::Store(e) => e.retryable(),
            Self::Internal(_) => false,
        }
    }
}

impl RouteError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::Chat(ChatError::EmptyMessage) => StatusCode::BAD_REQUEST,
            Self::Chat(ChatError::TurnInFlight) => StatusCode::CONFLICT,
            Self::Chat(ChatError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Chat(ChatError::InvalidPolicy(_)) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, code = self.error_code(), "request failed");
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "retryable": self.retryable(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
