use chrono::{Datelike, NaiveDateTime};

use super::amount::Amount;
use super::views::MonthKey;

/// One ingested sale, built from a single CSV row
///
/// Fields missing from the source stay at their zero value: empty strings,
/// zero amounts and quantities, and `None` dates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    /// 1-based position of the data row in the source
    pub row: u64,
    pub transaction_id: String,
    pub transaction_date: Option<NaiveDateTime>,
    pub user_id: String,
    pub country: String,
    pub region: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price: Amount,
    pub quantity: i64,
    pub total_price: Amount,
    pub stock_quantity: i64,
    pub added_date: Option<NaiveDateTime>,
}

impl Transaction {
    /// Calendar month this sale is reported under
    pub fn month_key(&self) -> MonthKey {
        match self.transaction_date {
            Some(date) => MonthKey::new(date.year(), date.month()),
            None => MonthKey::UNSET,
        }
    }
}
