use chrono::Month;
use serde::Serialize;

use super::amount::Amount;

/// Revenue of one product within one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryProductRevenue {
    pub country: String,
    pub product_name: String,
    pub total_revenue: Amount,
    pub transaction_count: u64,
}

/// Purchase volume of one product with its latest known stock level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFrequency {
    pub product_name: String,
    pub purchase_count: i64,
    pub current_stock: i64,
}

/// Sales totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySales {
    pub month: String,
    pub year: i32,
    pub total_sales: Amount,
    pub sales_volume: i64,
    #[serde(skip)]
    pub month_number: u32,
}

/// Revenue and quantity sold in one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRevenue {
    pub region: String,
    pub total_revenue: Amount,
    pub items_sold: i64,
}

/// (year, month) bucket for monthly sales
///
/// Rows without a parseable transaction date share the `UNSET` bucket,
/// reported as month "Unknown" of year 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub const UNSET: MonthKey = MonthKey { year: 0, month: 0 };

    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// English month name ("January"), or "Unknown" for the unset bucket
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

impl MonthlySales {
    /// Empty accumulator for a month bucket
    pub fn empty(key: MonthKey) -> Self {
        Self {
            month: key.month_name().to_string(),
            year: key.year,
            total_sales: Amount::ZERO,
            sales_volume: 0,
            month_number: key.month,
        }
    }
}
