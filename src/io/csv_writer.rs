use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::IoError;
use crate::domain::{
    CountryProductRevenue, MonthlySales, ProductFrequency, RegionRevenue, SnapshotMetadata, View,
};

/// A serializable row with a fixed CSV header
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRow for CountryProductRevenue {
    const HEADERS: &'static [&'static str] =
        &["country", "product_name", "total_revenue", "transaction_count"];
}

impl CsvRow for ProductFrequency {
    const HEADERS: &'static [&'static str] = &["product_name", "purchase_count", "current_stock"];
}

impl CsvRow for MonthlySales {
    const HEADERS: &'static [&'static str] = &["month", "year", "total_sales", "sales_volume"];
}

impl CsvRow for RegionRevenue {
    const HEADERS: &'static [&'static str] = &["region", "total_revenue", "items_sold"];
}

impl CsvRow for SnapshotMetadata {
    const HEADERS: &'static [&'static str] = &[
        "last_updated",
        "processing_duration",
        "record_count",
        "rows_skipped",
        "distinct_groups",
    ];
}

/// Encode rows as CSV, header first even when there are no rows
pub fn encode_rows<T: CsvRow>(rows: &[T]) -> Result<Vec<u8>, IoError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| IoError::Io(e.into_error()))
}

/// Write one view as CSV
pub async fn write_view<W>(view: View<'_>, mut writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    let bytes = match view {
        View::CountryRevenue(rows) => encode_rows(rows)?,
        View::TopProducts(rows) => encode_rows(rows)?,
        View::MonthlySales(rows) => encode_rows(rows)?,
        View::TopRegions(rows) => encode_rows(rows)?,
    };

    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Write snapshot metadata as a one-row CSV
pub async fn write_metadata<W>(metadata: &SnapshotMetadata, mut writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    let bytes = encode_rows(std::slice::from_ref(metadata))?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
