//! Mock store data: fixtures served whenever the store API is unreachable
//! or unconfigured.
//!
//! Dates are generated relative to "now" so the dashboard always shows
//! today's schedule. Sales history carries a little random noise.

use std::cmp::Ordering;
use std::f64::consts::PI;

use rand::Rng;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use super::types::*;
use super::{AgentChat, StoreData};
use crate::llm::types::Message;

pub const MOCK_AGENT_REPLY: &str = "AI chat response (mock data - configure Azure AI endpoint)";

// =============================================================================
// TIME HELPERS
// =============================================================================

fn timestamp_from_now(offset: Duration) -> String {
    (OffsetDateTime::now_utc() + offset)
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn date_from_today(days: i64) -> String {
    OffsetDateTime::now_utc()
        .date()
        .saturating_add(Duration::days(days))
        .to_string()
}

// =============================================================================
// FIXTURES
// =============================================================================

#[must_use]
pub fn store() -> Store {
    Store {
        store_id: "STORE-001".into(),
        store_number: "4521".into(),
        name: "Downtown Market".into(),
        region: "Northeast".into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn inventory_item(
    id: &str,
    name: &str,
    category: &str,
    stock: f64,
    unit: &str,
    reorder_point: f64,
    optimal_stock: f64,
    insights: AiInsights,
) -> InventoryItem {
    InventoryItem {
        product_id: id.into(),
        product_name: name.into(),
        category: category.into(),
        current_stock: stock,
        unit_of_measure: unit.into(),
        reorder_point,
        optimal_stock,
        ai_insights: insights,
        last_updated: timestamp_from_now(Duration::ZERO),
    }
}

fn insights(status: StockStatus, days: f64, order: f64, confidence: f64, reasoning: &str) -> AiInsights {
    AiInsights {
        stock_status: status,
        days_until_stockout: Some(days),
        recommended_order_quantity: order,
        confidence,
        reasoning: reasoning.into(),
    }
}

#[must_use]
pub fn inventory() -> Vec<InventoryItem> {
    vec![
        inventory_item(
            "PROD-001",
            "Organic Milk 1 Gallon",
            "Dairy",
            45.0,
            "gallon",
            50.0,
            120.0,
            insights(
                StockStatus::Low,
                4.5,
                75.0,
                0.87,
                "Low stock: 4.5 days remaining. Average daily sales: 10.0 units. Recommend ordering 75 units.",
            ),
        ),
        inventory_item(
            "PROD-002",
            "Fresh Bread - Whole Wheat",
            "Bakery",
            12.0,
            "loaf",
            30.0,
            80.0,
            insights(
                StockStatus::Critical,
                1.2,
                68.0,
                0.92,
                "URGENT: Only 1.2 days of stock remaining at current sales velocity of 10.0 units/day. Recommend immediate order of 68 units.",
            ),
        ),
        inventory_item(
            "PROD-003",
            "Bananas - Organic",
            "Produce",
            156.0,
            "lb",
            100.0,
            200.0,
            insights(
                StockStatus::Optimal,
                7.8,
                44.0,
                0.85,
                "Stock levels optimal. Current inventory supports 8 days of sales.",
            ),
        ),
        inventory_item(
            "PROD-004",
            "Ground Beef 80/20",
            "Meat",
            234.0,
            "lb",
            80.0,
            150.0,
            insights(
                StockStatus::Overstock,
                39.0,
                0.0,
                0.79,
                "Overstock detected: 39 days of inventory. Consider promotional pricing to accelerate sales.",
            ),
        ),
        inventory_item(
            "PROD-005",
            "Cheddar Cheese 8oz",
            "Dairy",
            78.0,
            "unit",
            60.0,
            140.0,
            insights(
                StockStatus::Optimal,
                9.8,
                62.0,
                0.91,
                "Stock levels optimal. Current inventory supports 10 days of sales.",
            ),
        ),
    ]
}

fn sales_history(days: i64, base: f64, variance: f64) -> Vec<DataPoint> {
    let mut rng = rand::rng();
    (0..days)
        .map(|i| DataPoint {
            date: date_from_today(i - (days - 1)),
            value: (base + (rng.random::<f64>() - 0.5) * variance).floor(),
        })
        .collect()
}

fn forecast_curve(base: f64, amplitude: f64, band: f64) -> Vec<ForecastPoint> {
    (0..14_i32)
        .map(|i| {
            let predicted = base + (f64::from(i) / 7.0 * PI).sin() * amplitude;
            ForecastPoint {
                date: date_from_today(i64::from(i)),
                value: 0.0,
                predicted_value: predicted,
                confidence_lower: predicted * (1.0 - band),
                confidence_upper: predicted * (1.0 + band),
            }
        })
        .collect()
}

#[must_use]
pub fn demand_forecasts() -> Vec<DemandForecast> {
    vec![
        DemandForecast {
            product_id: "PROD-001".into(),
            product_name: "Organic Milk 1 Gallon".into(),
            historical_sales: sales_history(30, 10.0, 4.0),
            forecast: forecast_curve(10.0, 2.0, 0.2),
        },
        DemandForecast {
            product_id: "PROD-002".into(),
            product_name: "Fresh Bread - Whole Wheat".into(),
            historical_sales: sales_history(30, 12.0, 5.0),
            forecast: forecast_curve(12.0, 3.0, 0.25),
        },
    ]
}

/// Hourly staffing forecast: quiet overnight, a morning rush, and an
/// evening peak that the current schedule under-covers.
#[must_use]
pub fn hourly_forecast() -> Vec<HourlyForecast> {
    (0..24_u32)
        .map(|hour| {
            let (customers, scheduled) = match hour {
                0..=7 | 22..=23 => (5_u32, 1_u32),
                9..=11 => (80, 2),
                17..=19 => (120, 3),
                _ => (45, 2),
            };
            let recommended = customers.div_ceil(30);
            let coverage_status = match scheduled.cmp(&recommended) {
                Ordering::Less => CoverageStatus::Understaffed,
                Ordering::Greater => CoverageStatus::Overstaffed,
                Ordering::Equal => CoverageStatus::Adequate,
            };
            HourlyForecast {
                hour,
                predicted_customers: customers,
                predicted_transactions: customers * 7 / 10,
                recommended_staff_count: recommended,
                currently_scheduled: scheduled,
                coverage_status,
            }
        })
        .collect()
}

fn shift(id: &str, employee: &str, name: &str, role: &str, start: &str, end: &str) -> Shift {
    Shift {
        shift_id: id.into(),
        employee_id: employee.into(),
        employee_name: name.into(),
        role: role.into(),
        date: date_from_today(0),
        start_time: start.into(),
        end_time: end.into(),
        hours: 8.0,
    }
}

#[must_use]
pub fn shifts() -> Vec<Shift> {
    vec![
        shift("SHIFT-001", "EMP-001", "Sarah Johnson", "Cashier", "09:00", "17:00"),
        shift("SHIFT-002", "EMP-002", "Mike Chen", "Stocker", "06:00", "14:00"),
        shift("SHIFT-003", "EMP-003", "Emily Rodriguez", "Manager", "08:00", "16:00"),
        shift("SHIFT-004", "EMP-004", "David Kim", "Cashier", "13:00", "21:00"),
    ]
}

#[must_use]
pub fn pricing_recommendations() -> Vec<PricingRecommendation> {
    vec![
        PricingRecommendation {
            product_id: "PROD-006".into(),
            product_name: "Fresh Salmon Fillet".into(),
            category: "Seafood".into(),
            current_price: 14.99,
            recommended_price: 11.99,
            price_change_percent: -20.0,
            reasoning: PricingReasoning {
                primary: "2 days to expiration - recommend 20% markdown to move inventory".into(),
                factors: PricingFactors {
                    inventory_age: 5.0,
                    current_velocity: 3.2,
                    demand_trend: DemandTrend::Stable,
                    expiration_date: Some(timestamp_from_now(Duration::days(2))),
                },
            },
            projected_impact: PricingImpact {
                revenue_change: 240.0,
                units_change: 32.0,
                margin_change: -3.2,
                waste_reduction: 8.5,
            },
            confidence: 0.89,
            urgency: Urgency::High,
        },
        PricingRecommendation {
            product_id: "PROD-007".into(),
            product_name: "Strawberries 1lb".into(),
            category: "Produce".into(),
            current_price: 4.99,
            recommended_price: 3.99,
            price_change_percent: -20.0,
            reasoning: PricingReasoning {
                primary: "3 days to expiration - recommend 20% markdown".into(),
                factors: PricingFactors {
                    inventory_age: 4.0,
                    current_velocity: 8.5,
                    demand_trend: DemandTrend::Stable,
                    expiration_date: Some(timestamp_from_now(Duration::days(3))),
                },
            },
            projected_impact: PricingImpact {
                revenue_change: 180.0,
                units_change: 65.0,
                margin_change: -2.8,
                waste_reduction: 12.3,
            },
            confidence: 0.92,
            urgency: Urgency::High,
        },
        PricingRecommendation {
            product_id: "PROD-004".into(),
            product_name: "Ground Beef 80/20".into(),
            category: "Meat".into(),
            current_price: 6.99,
            recommended_price: 5.99,
            price_change_percent: -14.0,
            reasoning: PricingReasoning {
                primary: "39 days of stock - recommend 14% markdown to accelerate sales".into(),
                factors: PricingFactors {
                    inventory_age: 12.0,
                    current_velocity: 6.0,
                    demand_trend: DemandTrend::Decreasing,
                    expiration_date: None,
                },
            },
            projected_impact: PricingImpact {
                revenue_change: 420.0,
                units_change: 95.0,
                margin_change: -1.5,
                waste_reduction: 0.0,
            },
            confidence: 0.78,
            urgency: Urgency::Medium,
        },
    ]
}

#[must_use]
pub fn placement_recommendations() -> Vec<PlacementRecommendation> {
    vec![
        PlacementRecommendation {
            recommendation_id: "REC-001".into(),
            kind: PlacementKind::CrossPromote,
            product_id: "PROD-008".into(),
            product_name: "Pasta Sauce".into(),
            current_location: "Aisle 4 - Canned Goods".into(),
            suggested_location: "Near Pasta (Aisle 3)".into(),
            reasoning: "Frequently bought with pasta (lift: 3.2). 68% of pasta purchases include sauce.".into(),
            projected_impact: PlacementImpact { sales_increase: 18.5, basket_size_increase: 4.2, clv_impact: 2.8 },
            confidence: 0.91,
        },
        PlacementRecommendation {
            recommendation_id: "REC-002".into(),
            kind: PlacementKind::EndCapDisplay,
            product_id: "PROD-009".into(),
            product_name: "Craft Beer Variety Pack".into(),
            current_location: "Aisle 8 - Beer".into(),
            suggested_location: "End Cap Display - Front of Store".into(),
            reasoning: "High margin item with strong weekend demand. End cap placement increases visibility.".into(),
            projected_impact: PlacementImpact { sales_increase: 32.0, basket_size_increase: 8.5, clv_impact: 5.2 },
            confidence: 0.85,
        },
        PlacementRecommendation {
            recommendation_id: "REC-003".into(),
            kind: PlacementKind::MoveProduct,
            product_id: "PROD-010".into(),
            product_name: "Coffee Beans - Premium".into(),
            current_location: "Aisle 2 - Bottom Shelf".into(),
            suggested_location: "Aisle 2 - Eye Level".into(),
            reasoning: "Premium product underperforming due to poor visibility. Eye level placement increases conversion."
                .into(),
            projected_impact: PlacementImpact { sales_increase: 24.0, basket_size_increase: 3.1, clv_impact: 4.5 },
            confidence: 0.87,
        },
    ]
}

fn shrinkage(id: &str, hours_ago: i64, kind: ShrinkageKind, name: &str, loss: f64, status: ShrinkageStatus) -> ShrinkageEvent {
    ShrinkageEvent {
        event_id: id.into(),
        detected_at: timestamp_from_now(-Duration::hours(hours_ago)),
        event_type: kind,
        product_name: name.into(),
        estimated_loss: loss,
        status,
    }
}

#[must_use]
pub fn shrinkage_events() -> Vec<ShrinkageEvent> {
    vec![
        shrinkage("SHRINK-001", 2, ShrinkageKind::Anomaly, "Premium Steaks", 245.80, ShrinkageStatus::Investigating),
        shrinkage(
            "SHRINK-002",
            5,
            ShrinkageKind::InventoryVariance,
            "Wine - Red Blend",
            89.94,
            ShrinkageStatus::Investigating,
        ),
        shrinkage("SHRINK-003", 24, ShrinkageKind::PriceDiscrepancy, "Organic Chicken", 34.50, ShrinkageStatus::Resolved),
    ]
}

fn metric(
    label: &str,
    value: MetricValue,
    change: f64,
    change_label: &str,
    trend: MetricTrend,
    status: Option<MetricStatus>,
) -> MetricCard {
    MetricCard {
        label: label.into(),
        value,
        change: Some(change),
        change_label: Some(change_label.into()),
        trend: Some(trend),
        status,
    }
}

#[must_use]
pub fn operational_metrics() -> OperationalMetrics {
    use MetricTrend::{Down, Up};
    use MetricValue::{Number, Text};

    let success = Some(MetricStatus::Success);
    [
        ("clv", metric("Customer Lifetime Value", Text("$2,847".into()), 12.3, "vs last quarter", Up, success)),
        ("revenue", metric("Revenue (Today)", Text("$18,245".into()), 8.2, "vs yesterday", Up, None)),
        ("basketSize", metric("Avg Basket Size", Text("$47.32".into()), 5.8, "vs last week", Up, None)),
        ("churnRisk", metric("High Churn Risk Customers", Number(127.0), -15.2, "vs last month", Down, success)),
        (
            "stockouts",
            metric("Active Stockouts", Number(3.0), -40.0, "vs last week", Down, Some(MetricStatus::Warning)),
        ),
        ("waste", metric("Waste Rate", Text("2.4%".into()), -18.5, "vs last month", Down, success)),
        ("laborCost", metric("Labor Cost", Text("$3,240".into()), -8.3, "vs forecast", Down, success)),
        ("margin", metric("Gross Margin", Text("24.8%".into()), 2.1, "vs target", Up, None)),
    ]
    .into_iter()
    .map(|(key, card)| (key.to_string(), card))
    .collect()
}

#[must_use]
pub fn agent_reply() -> AgentReply {
    AgentReply { response: MOCK_AGENT_REPLY.into(), data: None }
}

// =============================================================================
// MOCK STORE
// =============================================================================

/// Serves the fixtures above through the accessor traits.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockStore;

#[async_trait::async_trait]
impl StoreData for MockStore {
    async fn store_info(&self) -> Result<Store, StoreApiError> {
        Ok(store())
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreApiError> {
        Ok(inventory())
    }

    async fn demand_forecasts(&self) -> Result<Vec<DemandForecast>, StoreApiError> {
        Ok(demand_forecasts())
    }

    async fn shifts(&self) -> Result<Vec<Shift>, StoreApiError> {
        Ok(shifts())
    }

    async fn hourly_forecast(&self) -> Result<Vec<HourlyForecast>, StoreApiError> {
        Ok(hourly_forecast())
    }

    async fn pricing_recommendations(&self) -> Result<Vec<PricingRecommendation>, StoreApiError> {
        Ok(pricing_recommendations())
    }

    async fn placement_recommendations(&self) -> Result<Vec<PlacementRecommendation>, StoreApiError> {
        Ok(placement_recommendations())
    }

    async fn shrinkage_events(&self) -> Result<Vec<ShrinkageEvent>, StoreApiError> {
        Ok(shrinkage_events())
    }

    async fn operational_metrics(&self) -> Result<OperationalMetrics, StoreApiError> {
        Ok(operational_metrics())
    }
}

#[async_trait::async_trait]
impl AgentChat for MockStore {
    async fn chat(&self, _messages: &[Message]) -> Result<AgentReply, StoreApiError> {
        Ok(agent_reply())
    }
}

#[cfg(test)]
#[path = "mock_test.rs"]
mod tests;
