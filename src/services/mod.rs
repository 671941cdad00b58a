//! Chat services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `context` turns a message into a store digest, `conversation` owns the
//! transcript of one session, and `chat` drives a turn across both plus the
//! completion and agent clients. `sweeper` closes sessions nobody has
//! touched for a while. Routes only translate HTTP to these calls.

pub mod chat;
pub mod context;
pub mod conversation;
pub mod sweeper;
