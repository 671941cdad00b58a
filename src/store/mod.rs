//! Store data: typed accessors for the store backend API.
//!
//! DESIGN
//! ======
//! The chat context assembler and the dashboard routes only see the
//! [`StoreData`] and [`AgentChat`] traits. Production wires in
//! [`StoreApiClient`]; tests wire in [`MockStore`] or the failure-injecting
//! doubles in `test_helpers`.

pub mod client;
pub mod config;
pub mod mock;
pub mod types;

pub use client::StoreApiClient;
pub use config::StoreApiConfig;
pub use mock::MockStore;
pub use types::*;

use crate::llm::types::Message;

// =============================================================================
// ACCESSOR TRAITS
// =============================================================================

/// Read-only store data used by chat context and dashboard views.
#[async_trait::async_trait]
pub trait StoreData: Send + Sync {
    async fn store_info(&self) -> Result<Store, StoreApiError>;
    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreApiError>;
    async fn demand_forecasts(&self) -> Result<Vec<DemandForecast>, StoreApiError>;
    async fn shifts(&self) -> Result<Vec<Shift>, StoreApiError>;
    async fn hourly_forecast(&self) -> Result<Vec<HourlyForecast>, StoreApiError>;
    async fn pricing_recommendations(&self) -> Result<Vec<PricingRecommendation>, StoreApiError>;
    async fn placement_recommendations(&self) -> Result<Vec<PlacementRecommendation>, StoreApiError>;
    async fn shrinkage_events(&self) -> Result<Vec<ShrinkageEvent>, StoreApiError>;
    async fn operational_metrics(&self) -> Result<OperationalMetrics, StoreApiError>;
}

/// The store's own agent chat endpoint, used when no completion client is
/// configured.
#[async_trait::async_trait]
pub trait AgentChat: Send + Sync {
    /// Post the full message history and return the agent's reply.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreApiError`] if the call fails and no mock reply applies.
    async fn chat(&self, messages: &[Message]) -> Result<AgentReply, StoreApiError>;
}
