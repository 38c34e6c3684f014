use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use super::aggregates::Aggregates;
use crate::domain::{DashboardSnapshot, SnapshotMetadata};

pub const DEFAULT_TOP_PRODUCTS: usize = 20;
pub const DEFAULT_TOP_REGIONS: usize = 30;

/// Turns finished aggregates into sorted, truncated views
///
/// Orderings (ties broken so that every build of the same data is identical):
/// - country revenue: total revenue desc, then country, then product name
/// - top products: purchase count desc, then product name
/// - monthly sales: year desc, total sales desc, then month number
/// - top regions: total revenue desc, then region name
#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder {
    top_products: usize,
    top_regions: usize,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self {
            top_products: DEFAULT_TOP_PRODUCTS,
            top_regions: DEFAULT_TOP_REGIONS,
        }
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_products(mut self, limit: usize) -> Self {
        self.top_products = limit;
        self
    }

    pub fn with_top_regions(mut self, limit: usize) -> Self {
        self.top_regions = limit;
        self
    }

    /// Build a snapshot; `started` marks the beginning of the run
    pub fn build(&self, aggregates: Aggregates, rows_skipped: u64, started: Instant) -> DashboardSnapshot {
        let distinct_groups = aggregates.distinct_groups();
        let parts = aggregates.into_parts();

        let mut country_revenues = parts.country_revenues;
        country_revenues.sort_unstable_by(|a, b| {
            b.total_revenue
                .cmp(&a.total_revenue)
                .then_with(|| a.country.cmp(&b.country))
                .then_with(|| a.product_name.cmp(&b.product_name))
        });

        let mut top_products = parts.products;
        top_products.sort_unstable_by(|a, b| {
            b.purchase_count
                .cmp(&a.purchase_count)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        top_products.truncate(self.top_products);

        let mut monthly_sales = parts.monthly_sales;
        monthly_sales.sort_unstable_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| b.total_sales.cmp(&a.total_sales))
                .then_with(|| a.month_number.cmp(&b.month_number))
        });

        let mut top_regions = parts.regions;
        top_regions.sort_unstable_by(|a, b| {
            b.total_revenue
                .cmp(&a.total_revenue)
                .then_with(|| a.region.cmp(&b.region))
        });
        top_regions.truncate(self.top_regions);

        let metadata = SnapshotMetadata {
            last_updated: Some(Utc::now()),
            processing_duration: started.elapsed(),
            record_count: parts.records,
            rows_skipped,
            distinct_groups,
        };

        debug!(
            country_revenues = country_revenues.len(),
            top_products = top_products.len(),
            monthly_sales = monthly_sales.len(),
            top_regions = top_regions.len(),
            "Built dashboard snapshot"
        );

        DashboardSnapshot {
            country_revenues,
            top_products,
            monthly_sales,
            top_regions,
            metadata,
        }
    }
}
