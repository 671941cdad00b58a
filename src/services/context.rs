//! Context assembler: picks store topics from a chat message and
//! summarizes them into a digest for the completion prompt.
//!
//! DESIGN
//! ======
//! Topic selection is a case-insensitive substring scan against a fixed,
//! ordered trigger table. Every matched topic is fetched concurrently, but
//! the digest always lists snippets in table order. A topic whose fetch
//! fails is logged and left out; assembly itself never fails.

use std::fmt;

use futures::future::join_all;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::store::{CoverageStatus, MetricCard, OperationalMetrics, StoreApiError, StoreData, Urgency};

/// Digest text used when no topic matched or every fetch failed.
pub const NO_CONTEXT_TEXT: &str = "No specific database context available for this query.";

/// Low/critical items named in the inventory summary.
const TOP_CONCERNS: usize = 3;

// =============================================================================
// TOPICS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Inventory,
    Pricing,
    Workforce,
    Metrics,
}

/// Ordered trigger table. Declaration order is digest order.
pub const TOPICS: &[(Topic, &[&str])] = &[
    (Topic::Inventory, &["inventory", "stock"]),
    (Topic::Pricing, &["pricing", "price"]),
    (Topic::Workforce, &["staff", "workforce", "schedule"]),
    (Topic::Metrics, &["metric", "performance", "overview"]),
];

impl Topic {
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Inventory => "Current Inventory Status",
            Self::Pricing => "Pricing Recommendations",
            Self::Workforce => "Workforce Status",
            Self::Metrics => "Key Metrics",
        }
    }

    async fn summarize(self, data: &dyn StoreData) -> Result<String, ContextError> {
        match self {
            Self::Inventory => summarize_inventory(data).await,
            Self::Pricing => summarize_pricing(data).await,
            Self::Workforce => summarize_workforce(data).await,
            Self::Metrics => summarize_metrics(data).await,
        }
    }
}

/// Topics whose triggers occur in `message`, in table order.
#[must_use]
pub fn matched_topics(message: &str) -> Vec<Topic> {
    let lower = message.to_lowercase();
    TOPICS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| lower.contains(t)))
        .map(|(topic, _)| *topic)
        .collect()
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("store fetch failed: {0}")]
    Fetch(#[from] StoreApiError),
    #[error("metric missing: {0}")]
    MissingMetric(&'static str),
}

impl ErrorCode for ContextError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "E_CONTEXT_FETCH",
            Self::MissingMetric(_) => "E_MISSING_METRIC",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.retryable())
    }
}

// =============================================================================
// DIGEST
// =============================================================================

/// One topic's contribution to a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    topic: Topic,
    summary: String,
}

impl Snippet {
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\n{}", self.topic.header(), self.summary)
    }
}

/// Per-turn store context. Built once by [`assemble`], read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextDigest {
    snippets: Vec<Snippet>,
}

impl ContextDigest {
    #[must_use]
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    #[must_use]
    pub fn has_topic(&self, topic: Topic) -> bool {
        self.snippets.iter().any(|s| s.topic == topic)
    }
}

impl fmt::Display for ContextDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.snippets.is_empty() {
            return f.write_str(NO_CONTEXT_TEXT);
        }
        for (i, snippet) in self.snippets.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{snippet}")?;
        }
        Ok(())
    }
}

/// Build the digest for one chat message.
pub async fn assemble(data: &dyn StoreData, message: &str) -> ContextDigest {
    let topics = matched_topics(message);
    if topics.is_empty() {
        return ContextDigest::default();
    }

    let results = join_all(
        topics
            .iter()
            .map(|&topic| async move { (topic, topic.summarize(data).await) }),
    )
    .await;

    let snippets: Vec<Snippet> = results
        .into_iter()
        .filter_map(|(topic, result)| match result {
            Ok(summary) => Some(Snippet { topic, summary }),
            Err(e) => {
                warn!(topic = topic.header(), error = %e, "context: snippet omitted");
                None
            }
        })
        .collect();

    info!(matched = topics.len(), included = snippets.len(), "context: digest assembled");
    ContextDigest { snippets }
}

// =============================================================================
// SUMMARIES
// =============================================================================

async fn summarize_inventory(data: &dyn StoreData) -> Result<String, ContextError> {
    let items = data.inventory().await?;
    let flagged: Vec<_> = items
        .iter()
        .filter(|item| item.ai_insights.stock_status.needs_attention())
        .collect();
    let concerns = flagged
        .iter()
        .take(TOP_CONCERNS)
        .map(|item| format!("{} ({} {})", item.product_name, item.current_stock, item.unit_of_measure))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "- Total items: {}\n- Low/Critical stock items: {}\n- Top concerns: {concerns}",
        items.len(),
        flagged.len()
    ))
}

async fn summarize_pricing(data: &dyn StoreData) -> Result<String, ContextError> {
    let recs = data.pricing_recommendations().await?;
    let high = recs
        .iter()
        .filter(|r| r.urgency == Urgency::High)
        .count();
    Ok(format!("- Total recommendations: {}\n- High priority items: {high}", recs.len()))
}

async fn summarize_workforce(data: &dyn StoreData) -> Result<String, ContextError> {
    let (shifts, forecast) = futures::try_join!(data.shifts(), data.hourly_forecast())?;
    let understaffed = forecast
        .iter()
        .filter(|slot| slot.coverage_status == CoverageStatus::Understaffed)
        .count();
    Ok(format!("- Scheduled shifts today: {}\n- Understaffed hours: {understaffed}", shifts.len()))
}

async fn summarize_metrics(data: &dyn StoreData) -> Result<String, ContextError> {
    let metrics = data.operational_metrics().await?;
    let clv = metric(&metrics, "clv")?;
    let revenue = metric(&metrics, "revenue")?;
    let stockouts = metric(&metrics, "stockouts")?;
    Ok(format!(
        "- CLV: {} ({}%)\n- Revenue: {} ({}%)\n- Stockouts: {}",
        clv.value,
        signed_change(clv.change),
        revenue.value,
        signed_change(revenue.change),
        stockouts.value
    ))
}

fn metric<'a>(metrics: &'a OperationalMetrics, key: &'static str) -> Result<&'a MetricCard, ContextError> {
    metrics.get(key).ok_or(ContextError::MissingMetric(key))
}

fn signed_change(change: Option<f64>) -> String {
    match change {
        Some(c) if c > 0.0 => format!("+{c}"),
        Some(c) => format!("{c}"),
        None => "0".into(),
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
