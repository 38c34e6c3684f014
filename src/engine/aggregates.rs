use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::domain::{
    Amount, CountryProductRevenue, MonthKey, MonthlySales, ProductFrequency, RegionRevenue,
    Transaction,
};

/// Product accumulator plus the source row its stock reading came from
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProductTally {
    frequency: ProductFrequency,
    stock_row: u64,
}

impl ProductTally {
    /// Keep the non-zero reading from the latest source row
    fn observe_stock(&mut self, stock: i64, row: u64) {
        if stock == 0 {
            return;
        }
        if self.frequency.current_stock == 0 || row > self.stock_row {
            self.frequency.current_stock = stock;
            self.stock_row = row;
        }
    }
}

/// The four aggregation dictionaries of one ingestion run
///
/// Every record updates all four maps together; callers sharing one
/// `Aggregates` between workers must hold a single lock around `apply`.
/// Quantity and money sums saturate at the `i64` bounds, so folding never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    countries: HashMap<(String, String), CountryProductRevenue>,
    products: HashMap<String, ProductTally>,
    months: HashMap<MonthKey, MonthlySales>,
    regions: HashMap<String, RegionRevenue>,
    records: u64,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one transaction into all four dictionaries
    pub fn apply(&mut self, tx: &Transaction) {
        self.records += 1;

        let country = self
            .countries
            .entry((tx.country.clone(), tx.product_name.clone()))
            .or_insert_with(|| CountryProductRevenue {
                country: tx.country.clone(),
                product_name: tx.product_name.clone(),
                total_revenue: Amount::ZERO,
                transaction_count: 0,
            });
        country.total_revenue += tx.total_price;
        country.transaction_count += 1;

        match self.products.entry(tx.product_name.clone()) {
            Entry::Occupied(mut e) => {
                let tally = e.get_mut();
                tally.frequency.purchase_count =
                    tally.frequency.purchase_count.saturating_add(tx.quantity);
                tally.observe_stock(tx.stock_quantity, tx.row);
            }
            Entry::Vacant(e) => {
                e.insert(ProductTally {
                    frequency: ProductFrequency {
                        product_name: tx.product_name.clone(),
                        purchase_count: tx.quantity,
                        current_stock: tx.stock_quantity,
                    },
                    stock_row: tx.row,
                });
            }
        }

        let key = tx.month_key();
        let month = self
            .months
            .entry(key)
            .or_insert_with(|| MonthlySales::empty(key));
        month.total_sales += tx.total_price;
        month.sales_volume = month.sales_volume.saturating_add(tx.quantity);

        let region = self
            .regions
            .entry(tx.region.clone())
            .or_insert_with(|| RegionRevenue {
                region: tx.region.clone(),
                total_revenue: Amount::ZERO,
                items_sold: 0,
            });
        region.total_revenue += tx.total_price;
        region.items_sold = region.items_sold.saturating_add(tx.quantity);
    }

    /// Combine a partial result built from a disjoint set of records
    pub fn merge(&mut self, other: Aggregates) {
        self.records += other.records;

        for (key, revenue) in other.countries {
            match self.countries.entry(key) {
                Entry::Occupied(mut e) => {
                    let existing = e.get_mut();
                    existing.total_revenue += revenue.total_revenue;
                    existing.transaction_count += revenue.transaction_count;
                }
                Entry::Vacant(e) => {
                    e.insert(revenue);
                }
            }
        }

        for (key, tally) in other.products {
            match self.products.entry(key) {
                Entry::Occupied(mut e) => {
                    let existing = e.get_mut();
                    existing.frequency.purchase_count = existing
                        .frequency
                        .purchase_count
                        .saturating_add(tally.frequency.purchase_count);
                    existing.observe_stock(tally.frequency.current_stock, tally.stock_row);
                }
                Entry::Vacant(e) => {
                    e.insert(tally);
                }
            }
        }

        for (key, sales) in other.months {
            match self.months.entry(key) {
                Entry::Occupied(mut e) => {
                    let existing = e.get_mut();
                    existing.total_sales += sales.total_sales;
                    existing.sales_volume = existing.sales_volume.saturating_add(sales.sales_volume);
                }
                Entry::Vacant(e) => {
                    e.insert(sales);
                }
            }
        }

        for (key, region) in other.regions {
            match self.regions.entry(key) {
                Entry::Occupied(mut e) => {
                    let existing = e.get_mut();
                    existing.total_revenue += region.total_revenue;
                    existing.items_sold = existing.items_sold.saturating_add(region.items_sold);
                }
                Entry::Vacant(e) => {
                    e.insert(region);
                }
            }
        }
    }

    /// Number of transactions folded in
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Number of distinct (country, product) groups
    pub fn distinct_groups(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Consume into unordered entry lists for the snapshot builder
    pub fn into_parts(self) -> AggregateParts {
        AggregateParts {
            country_revenues: self.countries.into_values().collect(),
            products: self
                .products
                .into_values()
                .map(|tally| tally.frequency)
                .collect(),
            monthly_sales: self.months.into_values().collect(),
            regions: self.regions.into_values().collect(),
            records: self.records,
        }
    }
}

/// Unsorted contents of a finished [`Aggregates`]
#[derive(Debug, Default)]
pub struct AggregateParts {
    pub country_revenues: Vec<CountryProductRevenue>,
    pub products: Vec<ProductFrequency>,
    pub monthly_sales: Vec<MonthlySales>,
    pub regions: Vec<RegionRevenue>,
    pub records: u64,
}
