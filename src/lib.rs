//! StoreAI assistant service.
//!
//! A retail operations backend: read-only store data for the dashboard and
//! a chat endpoint that grounds an Azure OpenAI deployment in that data,
//! degrading to the store's agent endpoint when the deployment is absent.

pub mod error;
pub mod llm;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
