use crate::routes::app;
use crate::services::chat::{ChatDispatcher, FallbackPolicy};
use crate::state::{AppState, test_helpers};
use crate::store::test_helpers::FlakyStore;
use crate::store::{MockStore, StoreData};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn inventory_route_serves_camel_case_records() {
    let (status, body) = get_json(test_helpers::test_app_state(), "/api/inventory").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[1]["productName"], "Fresh Bread - Whole Wheat");
    assert_eq!(body[1]["aiInsights"]["stockStatus"], "critical");
}

#[tokio::test]
async fn metrics_route_serves_keyed_cards() {
    let (status, body) = get_json(test_helpers::test_app_state(), "/api/metrics/operational").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clv"]["value"], "$2,847");
    assert_eq!(body["stockouts"]["value"], 3.0);
}

#[tokio::test]
async fn every_dashboard_route_answers() {
    for uri in [
        "/api/store",
        "/api/forecast/demand",
        "/api/workforce/shifts",
        "/api/workforce/forecast",
        "/api/pricing/recommendations",
        "/api/placement/recommendations",
        "/api/loss-prevention/events",
    ] {
        let (status, _) = get_json(test_helpers::test_app_state(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn store_failure_maps_to_bad_gateway() {
    let store: Arc<dyn StoreData> = Arc::new(FlakyStore::new().failing("shifts"));
    let chat = ChatDispatcher::new(None, store.clone(), Arc::new(MockStore), FallbackPolicy::default());
    let state = AppState::new(store, chat);

    let (status, body) = get_json(state, "/api/workforce/shifts").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E_STORE_STATUS");
    assert_eq!(body["retryable"], true);
}
