use super::*;
use crate::state::test_helpers;
use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn healthz_returns_ok() {
    let response = app(test_helpers::test_app_state())
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn chat_errors_map_to_client_statuses() {
    assert_eq!(RouteError::from(ChatError::EmptyMessage).status(), StatusCode::BAD_REQUEST);
    assert_eq!(RouteError::from(ChatError::TurnInFlight).status(), StatusCode::CONFLICT);
    assert_eq!(RouteError::from(ChatError::SessionNotFound(Uuid::nil())).status(), StatusCode::NOT_FOUND);
}

#[test]
fn store_errors_map_to_bad_gateway() {
    let err = RouteError::from(StoreApiError::Request("reset".into()));
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(err.error_code(), "E_STORE_REQUEST");
    assert!(err.retryable());
}

#[tokio::test]
async fn error_body_carries_code_message_and_retryable() {
    let response = RouteError::from(ChatError::TurnInFlight).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "E_TURN_IN_FLIGHT");
    assert_eq!(body["message"], "a reply is already in progress");
    assert_eq!(body["retryable"], true);
}
