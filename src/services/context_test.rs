use super::*;
use crate::store::test_helpers::FlakyStore;
use crate::store::{MetricCard, MetricValue, mock};

// =========================================================================
// matched_topics
// =========================================================================

#[test]
fn matching_is_case_insensitive() {
    assert_eq!(matched_topics("What's my INVENTORY status?"), vec![Topic::Inventory]);
    assert_eq!(matched_topics("Show the Staff Schedule"), vec![Topic::Workforce]);
}

#[test]
fn matching_follows_table_order_not_message_order() {
    let topics = matched_topics("performance overview, then prices, then stock");
    assert_eq!(topics, vec![Topic::Inventory, Topic::Pricing, Topic::Metrics]);
}

#[test]
fn each_topic_matches_once() {
    assert_eq!(matched_topics("stock inventory stock"), vec![Topic::Inventory]);
}

#[test]
fn unrelated_message_matches_nothing() {
    assert!(matched_topics("hello there").is_empty());
}

// =========================================================================
// assemble
// =========================================================================

#[tokio::test]
async fn inventory_digest_counts_flagged_items() {
    let store = FlakyStore::new();
    let digest = assemble(&store, "What's my inventory status?").await;
    let text = digest.to_string();
    assert!(text.starts_with("Current Inventory Status:\n"));
    assert!(text.contains("Total items: 5"));
    assert!(text.contains("Low/Critical stock items: 2"));
    assert!(text.contains("Top concerns: Organic Milk 1 Gallon (45 gallon), Fresh Bread - Whole Wheat (12 loaf)"));
    assert_eq!(store.call_log(), vec!["inventory"]);
}

#[tokio::test]
async fn top_concerns_are_capped_at_three() {
    let mut items = mock::inventory();
    for item in &mut items {
        item.ai_insights.stock_status = crate::store::StockStatus::Critical;
    }
    let store = FlakyStore::new().with_inventory(items);
    let digest = assemble(&store, "stock").await;
    let concerns = digest.snippets()[0]
        .summary()
        .lines()
        .find(|l| l.starts_with("- Top concerns:"))
        .unwrap()
        .to_string();
    assert_eq!(concerns.matches(" (").count(), 3);
}

#[tokio::test]
async fn all_topics_render_in_order() {
    let store = FlakyStore::new();
    let digest = assemble(&store, "overview of staff, pricing and stock").await;
    let topics: Vec<Topic> = digest.snippets().iter().map(Snippet::topic).collect();
    assert_eq!(topics, vec![Topic::Inventory, Topic::Pricing, Topic::Workforce, Topic::Metrics]);

    let text = digest.to_string();
    assert!(text.contains("Pricing Recommendations:\n- Total recommendations: 3\n- High priority items: 2"));
    assert!(text.contains("Workforce Status:\n- Scheduled shifts today: 4\n- Understaffed hours: 6"));
    assert!(text.contains("Key Metrics:\n- CLV: $2,847 (+12.3%)\n- Revenue: $18,245 (+8.2%)\n- Stockouts: 3"));
    assert_eq!(text.matches("\n\n").count(), 3);
}

#[tokio::test]
async fn failed_fetch_omits_only_that_snippet() {
    let store = FlakyStore::new().failing("pricing_recommendations");
    let digest = assemble(&store, "stock and price").await;
    assert!(digest.has_topic(Topic::Inventory));
    assert!(!digest.has_topic(Topic::Pricing));
    assert!(!digest.to_string().contains("Pricing Recommendations"));
}

#[tokio::test]
async fn workforce_needs_both_fetches() {
    let store = FlakyStore::new().failing("hourly_forecast");
    let digest = assemble(&store, "who is on the schedule?").await;
    assert!(digest.is_empty());
    assert_eq!(digest.to_string(), NO_CONTEXT_TEXT);
}

#[tokio::test]
async fn missing_metric_omits_metrics_snippet() {
    let mut metrics = mock::operational_metrics();
    metrics.remove("stockouts");
    let store = FlakyStore::new().with_metrics(metrics);
    let digest = assemble(&store, "performance").await;
    assert!(!digest.has_topic(Topic::Metrics));
}

#[tokio::test]
async fn negative_and_missing_changes_render_plainly() {
    let mut metrics = mock::operational_metrics();
    metrics.insert(
        "clv".into(),
        MetricCard {
            label: "CLV".into(),
            value: MetricValue::Number(10.0),
            change: Some(-5.5),
            change_label: None,
            trend: None,
            status: None,
        },
    );
    if let Some(revenue) = metrics.get_mut("revenue") {
        revenue.change = None;
    }
    let store = FlakyStore::new().with_metrics(metrics);
    let text = assemble(&store, "metrics").await.to_string();
    assert!(text.contains("- CLV: 10 (-5.5%)"));
    assert!(text.contains("- Revenue: $18,245 (0%)"));
}

#[tokio::test]
async fn no_match_makes_no_calls() {
    let store = FlakyStore::new();
    let digest = assemble(&store, "hello").await;
    assert_eq!(digest.to_string(), NO_CONTEXT_TEXT);
    assert!(store.call_log().is_empty());
}

#[tokio::test]
async fn same_message_builds_equal_digests() {
    let store = FlakyStore::new();
    let first = assemble(&store, "pricing").await;
    let second = assemble(&store, "pricing").await;
    assert_eq!(first, second);
}
