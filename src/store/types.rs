//! Store records: the JSON shapes served by the store data API.
//!
//! Field names are camelCase and enum values lowercase/snake_case so a
//! backend payload deserializes and re-serializes unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by store data API operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreApiError {
    /// A store API setting could not be parsed.
    #[error("store API config invalid: {0}")]
    Config(String),

    /// The HTTP request to the store API failed.
    #[error("store API request failed: {0}")]
    Request(String),

    /// The store API answered with a non-success status.
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response body did not match the expected record shape.
    #[error("store API response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for StoreApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_STORE_CONFIG",
            Self::Request(_) => "E_STORE_REQUEST",
            Self::Status { .. } => "E_STORE_STATUS",
            Self::Decode(_) => "E_STORE_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// STORE + INVENTORY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub store_id: String,
    pub store_number: String,
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Optimal,
    Low,
    Critical,
    Overstock,
}

impl StockStatus {
    /// Low and critical items are the ones worth raising.
    #[must_use]
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Low | Self::Critical)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub stock_status: StockStatus,
    pub days_until_stockout: Option<f64>,
    pub recommended_order_quantity: f64,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub current_stock: f64,
    pub unit_of_measure: String,
    pub reorder_point: f64,
    pub optimal_stock: f64,
    pub ai_insights: AiInsights,
    pub last_updated: String,
}

// =============================================================================
// FORECASTS + WORKFORCE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: String,
    pub value: f64,
    pub predicted_value: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandForecast {
    pub product_id: String,
    pub product_name: String,
    pub historical_sales: Vec<DataPoint>,
    pub forecast: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub shift_id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub role: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Adequate,
    Understaffed,
    Overstaffed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    pub hour: u32,
    pub predicted_customers: u32,
    pub predicted_transactions: u32,
    pub recommended_staff_count: u32,
    pub currently_scheduled: u32,
    pub coverage_status: CoverageStatus,
}

// =============================================================================
// PRICING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandTrend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingFactors {
    pub inventory_age: f64,
    pub current_velocity: f64,
    pub demand_trend: DemandTrend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReasoning {
    pub primary: String,
    pub factors: PricingFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingImpact {
    pub revenue_change: f64,
    pub units_change: f64,
    pub margin_change: f64,
    pub waste_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecommendation {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub current_price: f64,
    pub recommended_price: f64,
    pub price_change_percent: f64,
    pub reasoning: PricingReasoning,
    pub projected_impact: PricingImpact,
    pub confidence: f64,
    pub urgency: Urgency,
}

// =============================================================================
// PLACEMENT + LOSS PREVENTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    MoveProduct,
    CrossPromote,
    EndCapDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementImpact {
    pub sales_increase: f64,
    pub basket_size_increase: f64,
    pub clv_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecommendation {
    pub recommendation_id: String,
    #[serde(rename = "type")]
    pub kind: PlacementKind,
    pub product_id: String,
    pub product_name: String,
    pub current_location: String,
    pub suggested_location: String,
    pub reasoning: String,
    pub projected_impact: PlacementImpact,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkageKind {
    Anomaly,
    InventoryVariance,
    PriceDiscrepancy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkageStatus {
    Investigating,
    Resolved,
    FalsePositive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShrinkageEvent {
    pub event_id: String,
    pub detected_at: String,
    pub event_type: ShrinkageKind,
    pub product_name: String,
    pub estimated_loss: f64,
    pub status: ShrinkageStatus,
}

// =============================================================================
// METRICS
// =============================================================================

/// A metric value is either preformatted text (`"$2,847"`) or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Success,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub label: String,
    pub value: MetricValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<MetricTrend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MetricStatus>,
}

/// Operational metrics keyed by metric name (`clv`, `revenue`, `stockouts`, ...).
pub type OperationalMetrics = BTreeMap<String, MetricCard>;

// =============================================================================
// AGENT
// =============================================================================

/// Reply from the store's own agent chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub response: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
