use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::error::DomainError;
use super::views::{CountryProductRevenue, MonthlySales, ProductFrequency, RegionRevenue};

/// Build information stamped on every published snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SnapshotMetadata {
    /// When the snapshot was built; `None` until the first ingestion completes
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_duration")]
    pub processing_duration: Duration,
    /// Structurally valid rows folded into the views
    pub record_count: u64,
    pub rows_skipped: u64,
    /// Distinct (country, product) groups
    pub distinct_groups: usize,
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:?}", duration))
}

/// Immutable set of precomputed dashboard views
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSnapshot {
    pub country_revenues: Vec<CountryProductRevenue>,
    pub top_products: Vec<ProductFrequency>,
    pub monthly_sales: Vec<MonthlySales>,
    pub top_regions: Vec<RegionRevenue>,
    pub metadata: SnapshotMetadata,
}

impl DashboardSnapshot {
    /// Borrow one named view
    pub fn view(&self, kind: ViewKind) -> View<'_> {
        match kind {
            ViewKind::CountryRevenue => View::CountryRevenue(&self.country_revenues),
            ViewKind::TopProducts => View::TopProducts(&self.top_products),
            ViewKind::MonthlySales => View::MonthlySales(&self.monthly_sales),
            ViewKind::TopRegions => View::TopRegions(&self.top_regions),
        }
    }

    /// True when the four views hold the same rows, ignoring metadata
    pub fn same_views(&self, other: &DashboardSnapshot) -> bool {
        self.country_revenues == other.country_revenues
            && self.top_products == other.top_products
            && self.monthly_sales == other.monthly_sales
            && self.top_regions == other.top_regions
    }
}

/// Names of the four views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    CountryRevenue,
    TopProducts,
    MonthlySales,
    TopRegions,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::CountryRevenue,
        ViewKind::TopProducts,
        ViewKind::MonthlySales,
        ViewKind::TopRegions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::CountryRevenue => "revenue-by-country",
            ViewKind::TopProducts => "top-products",
            ViewKind::MonthlySales => "sales-by-month",
            ViewKind::TopRegions => "top-regions",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace('_', "-");
        match name.as_str() {
            "revenue-by-country" | "country-revenue" => Ok(ViewKind::CountryRevenue),
            "top-products" => Ok(ViewKind::TopProducts),
            "sales-by-month" | "monthly-sales" => Ok(ViewKind::MonthlySales),
            "top-regions" => Ok(ViewKind::TopRegions),
            _ => Err(DomainError::UnknownView(s.to_string())),
        }
    }
}

/// Borrowed slice of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum View<'a> {
    CountryRevenue(&'a [CountryProductRevenue]),
    TopProducts(&'a [ProductFrequency]),
    MonthlySales(&'a [MonthlySales]),
    TopRegions(&'a [RegionRevenue]),
}

impl View<'_> {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::CountryRevenue(_) => ViewKind::CountryRevenue,
            View::TopProducts(_) => ViewKind::TopProducts,
            View::MonthlySales(_) => ViewKind::MonthlySales,
            View::TopRegions(_) => ViewKind::TopRegions,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            View::CountryRevenue(rows) => rows.len(),
            View::TopProducts(rows) => rows.len(),
            View::MonthlySales(rows) => rows.len(),
            View::TopRegions(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned handle on one view of a published snapshot
///
/// Keeps the snapshot alive without holding any store lock.
#[derive(Debug, Clone)]
pub struct SnapshotView {
    snapshot: Arc<DashboardSnapshot>,
    kind: ViewKind,
}

impl SnapshotView {
    pub fn new(snapshot: Arc<DashboardSnapshot>, kind: ViewKind) -> Self {
        Self { snapshot, kind }
    }

    pub fn view(&self) -> View<'_> {
        self.snapshot.view(self.kind)
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn metadata(&self) -> &SnapshotMetadata {
        &self.snapshot.metadata
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }
}

impl Serialize for SnapshotView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}
