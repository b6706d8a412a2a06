use super::{Feed, FeedCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use utoipa::ToSchema;
use uuid::Uuid;

/// Warehouse quantity counter for one feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStockEntry {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockEntryDraft {
    pub feed_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuantityPatch {
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: FeedCategory,
    pub label: String,
    pub quantity: u64,
}

/// Warehouse quantities aggregated by feed category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    /// One row per category, in category order
    pub by_category: Vec<CategoryTotal>,
    /// Every ledger entry, including entries whose feed is no longer catalogued
    pub grand_total: u64,
}

impl StockSummary {
    pub fn compute(feeds: &[Feed], entries: &[WarehouseStockEntry]) -> Self {
        let category_of: HashMap<Uuid, FeedCategory> =
            feeds.iter().map(|feed| (feed.id, feed.category)).collect();

        let mut totals: HashMap<FeedCategory, u64> = HashMap::new();
        let mut grand_total = 0u64;
        for entry in entries {
            let quantity = u64::from(entry.quantity);
            grand_total += quantity;
            if let Some(category) = category_of.get(&entry.feed_id) {
                *totals.entry(*category).or_default() += quantity;
            }
        }

        let by_category = FeedCategory::iter()
            .map(|category| CategoryTotal {
                category,
                label: category.label().to_string(),
                quantity: totals.get(&category).copied().unwrap_or(0),
            })
            .collect();

        Self {
            by_category,
            grand_total,
        }
    }

    pub fn quantity_for(&self, category: FeedCategory) -> u64 {
        self.by_category
            .iter()
            .find(|total| total.category == category)
            .map(|total| total.quantity)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn feed(category: FeedCategory) -> Feed {
        let now = Utc::now();
        Feed {
            id: Uuid::new_v4(),
            name: format!("{} sample", category.label()),
            category,
            price: Decimal::new(1250, 2),
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(feed_id: Uuid, quantity: u32) -> WarehouseStockEntry {
        let now = Utc::now();
        WarehouseStockEntry {
            id: Uuid::new_v4(),
            feed_id,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn feeds_without_entries_contribute_zero() {
        let feeds = vec![feed(FeedCategory::ShrimpFeed), feed(FeedCategory::FishFeedGrowfin)];
        let summary = StockSummary::compute(&feeds, &[]);

        assert_eq!(summary.by_category.len(), 3);
        assert!(summary.by_category.iter().all(|total| total.quantity == 0));
        assert_eq!(summary.grand_total, 0);
    }

    #[test]
    fn sums_entries_per_category() {
        let shrimp_a = feed(FeedCategory::ShrimpFeed);
        let shrimp_b = feed(FeedCategory::ShrimpFeed);
        let nutriva = feed(FeedCategory::FishFeedNutriva);
        let entries = vec![
            entry(shrimp_a.id, 12),
            entry(shrimp_b.id, 8),
            entry(nutriva.id, 5),
        ];

        let summary = StockSummary::compute(&[shrimp_a, shrimp_b, nutriva], &entries);
        assert_eq!(summary.quantity_for(FeedCategory::ShrimpFeed), 20);
        assert_eq!(summary.quantity_for(FeedCategory::FishFeedGrowfin), 0);
        assert_eq!(summary.quantity_for(FeedCategory::FishFeedNutriva), 5);
        assert_eq!(summary.grand_total, 25);
    }

    #[test]
    fn orphan_entries_only_count_toward_grand_total() {
        let growfin = feed(FeedCategory::FishFeedGrowfin);
        let entries = vec![entry(growfin.id, 4), entry(Uuid::new_v4(), 6)];

        let summary = StockSummary::compute(&[growfin], &entries);
        assert_eq!(summary.quantity_for(FeedCategory::FishFeedGrowfin), 4);
        assert_eq!(summary.grand_total, 10);
    }
}
