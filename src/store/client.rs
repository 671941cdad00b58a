//! HTTP client for the store data API.
//!
//! Every accessor goes through [`StoreApiClient::fetch`]: an unconfigured
//! API is answered from the mock fixtures, and a failed call falls back to
//! them too when `mock_fallback` is enabled.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::warn;

use super::config::StoreApiConfig;
use super::types::*;
use super::{AgentChat, StoreData, mock};
use crate::llm::types::Message;

pub const PATH_STORE_INFO: &str = "/store/info";
pub const PATH_INVENTORY: &str = "/inventory";
pub const PATH_DEMAND_FORECAST: &str = "/forecast/demand";
pub const PATH_SHIFTS: &str = "/workforce/shifts";
pub const PATH_HOURLY_FORECAST: &str = "/workforce/forecast";
pub const PATH_PRICING: &str = "/pricing/recommendations";
pub const PATH_PLACEMENT: &str = "/placement/recommendations";
pub const PATH_SHRINKAGE: &str = "/loss-prevention/events";
pub const PATH_METRICS: &str = "/metrics/operational";
pub const PATH_AGENT_CHAT: &str = "/ai/chat";

pub struct StoreApiClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: String,
    mock_fallback: bool,
}

impl StoreApiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &StoreApiConfig) -> Result<Self, StoreApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreApiError::HttpClientBuild(e.to_string()))?;
        let base_url = config.base_url().map(str::to_owned);
        if base_url.is_none() {
            warn!("store API not configured; serving mock data");
        }
        Ok(Self { http, base_url, api_key: config.api_key.clone(), mock_fallback: config.mock_fallback })
    }

    /// Whether calls reach a real backend.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    async fn fetch<T, F>(&self, method: Method, path: &'static str, body: Option<serde_json::Value>, mock: F) -> Result<T, StoreApiError>
    where
        T: DeserializeOwned + Send,
        F: FnOnce() -> T + Send,
    {
        let Some(base) = self.base_url.as_deref() else {
            warn!(path, "store API not configured; using mock data");
            return Ok(mock());
        };
        match self.request(method, base, path, body).await {
            Ok(value) => Ok(value),
            Err(e) if self.mock_fallback => {
                warn!(path, error = %e, "store API call failed; falling back to mock data");
                Ok(mock())
            }
            Err(e) => Err(e),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        base: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, StoreApiError> {
        let mut builder = self
            .http
            .request(method, format!("{base}{path}"))
            .header("x-api-key", &self.api_key);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| StoreApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreApiError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| StoreApiError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl StoreData for StoreApiClient {
    async fn store_info(&self) -> Result<Store, StoreApiError> {
        self.fetch(Method::GET, PATH_STORE_INFO, None, mock::store).await
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreApiError> {
        self.fetch(Method::GET, PATH_INVENTORY, None, mock::inventory).await
    }

    async fn demand_forecasts(&self) -> Result<Vec<DemandForecast>, StoreApiError> {
        self.fetch(Method::GET, PATH_DEMAND_FORECAST, None, mock::demand_forecasts)
            .await
    }

    async fn shifts(&self) -> Result<Vec<Shift>, StoreApiError> {
        self.fetch(Method::GET, PATH_SHIFTS, None, mock::shifts).await
    }

    async fn hourly_forecast(&self) -> Result<Vec<HourlyForecast>, StoreApiError> {
        self.fetch(Method::GET, PATH_HOURLY_FORECAST, None, mock::hourly_forecast)
            .await
    }

    async fn pricing_recommendations(&self) -> Result<Vec<PricingRecommendation>, StoreApiError> {
        self.fetch(Method::GET, PATH_PRICING, None, mock::pricing_recommendations)
            .await
    }

    async fn placement_recommendations(&self) -> Result<Vec<PlacementRecommendation>, StoreApiError> {
        self.fetch(Method::GET, PATH_PLACEMENT, None, mock::placement_recommendations)
            .await
    }

    async fn shrinkage_events(&self) -> Result<Vec<ShrinkageEvent>, StoreApiError> {
        self.fetch(Method::GET, PATH_SHRINKAGE, None, mock::shrinkage_events)
            .await
    }

    async fn operational_metrics(&self) -> Result<OperationalMetrics, StoreApiError> {
        self.fetch(Method::GET, PATH_METRICS, None, mock::operational_metrics)
            .await
    }
}

#[async_trait::async_trait]
impl AgentChat for StoreApiClient {
    async fn chat(&self, messages: &[Message]) -> Result<AgentReply, StoreApiError> {
        let body = json!({ "messages": messages });
        self.fetch(Method::POST, PATH_AGENT_CHAT, Some(body), mock::agent_reply)
            .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
