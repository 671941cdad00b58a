//! Read-only dashboard routes. Each one proxies a single store accessor.

use axum::extract::State;
use axum::response::Json;

use super::RouteError;
use crate::state::AppState;
use crate::store::{
    DemandForecast, HourlyForecast, InventoryItem, OperationalMetrics, PlacementRecommendation, PricingRecommendation,
    Shift, ShrinkageEvent, Store,
};

type ApiResult<T> = Result<Json<T>, RouteError>;

/// `GET /api/store`
pub async fn store_info(State(state): State<AppState>) -> ApiResult<Store> {
    Ok(Json(state.store.store_info().await?))
}

/// `GET /api/inventory`
pub async fn inventory(State(state): State<AppState>) -> ApiResult<Vec<InventoryItem>> {
    Ok(Json(state.store.inventory().await?))
}

/// `GET /api/forecast/demand`
pub async fn demand_forecasts(State(state): State<AppState>) -> ApiResult<Vec<DemandForecast>> {
    Ok(Json(state.store.demand_forecasts().await?))
}

/// `GET /api/workforce/shifts`
pub async fn shifts(State(state): State<AppState>) -> ApiResult<Vec<Shift>> {
    Ok(Json(state.store.shifts().await?))
}

/// `GET /api/workforce/forecast`
pub async fn hourly_forecast(State(state): State<AppState>) -> ApiResult<Vec<HourlyForecast>> {
    Ok(Json(state.store.hourly_forecast().await?))
}

/// `GET /api/pricing/recommendations`
pub async fn pricing_recommendations(State(state): State<AppState>) -> ApiResult<Vec<PricingRecommendation>> {
    Ok(Json(state.store.pricing_recommendations().await?))
}

/// `GET /api/placement/recommendations`
pub async fn placement_recommendations(State(state): State<AppState>) -> ApiResult<Vec<PlacementRecommendation>> {
    Ok(Json(state.store.placement_recommendations().await?))
}

/// `GET /api/loss-prevention/events`
pub async fn shrinkage_events(State(state): State<AppState>) -> ApiResult<Vec<ShrinkageEvent>> {
    Ok(Json(state.store.shrinkage_events().await?))
}

/// `GET /api/metrics/operational`
pub async fn operational_metrics(State(state): State<AppState>) -> ApiResult<OperationalMetrics> {
    Ok(Json(state.store.operational_metrics().await?))
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
