use super::*;
use crate::error::ErrorCode;

#[test]
fn role_serializes_lowercase() {
    let msg = Message::new(Role::Assistant, "hi");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "hi" }));
}

#[test]
fn message_deserializes_from_wire_shape() {
    let msg: Message = serde_json::from_str(r#"{"role":"user","content":"stock?"}"#).unwrap();
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "stock?");
}

#[test]
fn api_response_display_includes_status_and_message() {
    let err = LlmError::ApiResponse { status: 401, message: "bad key".into() };
    assert_eq!(err.to_string(), "API response error: status 401: bad key");
    assert_eq!(err.error_code(), "E_API_RESPONSE");
}

#[test]
fn server_errors_and_deadlines_are_retryable() {
    assert!(LlmError::ApiResponse { status: 503, message: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 429, message: String::new() }.retryable());
    assert!(LlmError::DeadlineExceeded { secs: 5 }.retryable());
    assert!(LlmError::ApiRequest("reset".into()).retryable());
}

#[test]
fn client_errors_and_cancellation_are_not_retryable() {
    assert!(!LlmError::ApiResponse { status: 400, message: String::new() }.retryable());
    assert!(!LlmError::Cancelled.retryable());
    assert!(!LlmError::MissingConfig { var: "X".into() }.retryable());
}
