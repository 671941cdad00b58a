//! Error codes shared by every service error type.
//!
//! DESIGN
//! ======
//! Each module owns its own `thiserror` enum. Route handlers never match on
//! those enums directly; they ask for a grepable code and a retryable flag
//! through [`ErrorCode`] and render both into the JSON error body.

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
