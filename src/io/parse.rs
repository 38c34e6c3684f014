use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv_async::StringRecord;

use crate::domain::{Amount, Transaction};

/// Logical input columns recognised in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    TransactionId,
    TransactionDate,
    UserId,
    Country,
    Region,
    ProductId,
    ProductName,
    Category,
    Price,
    Quantity,
    TotalPrice,
    StockQuantity,
    AddedDate,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::TransactionId,
        Column::TransactionDate,
        Column::UserId,
        Column::Country,
        Column::Region,
        Column::ProductId,
        Column::ProductName,
        Column::Category,
        Column::Price,
        Column::Quantity,
        Column::TotalPrice,
        Column::StockQuantity,
        Column::AddedDate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::TransactionId => "transaction_id",
            Column::TransactionDate => "transaction_date",
            Column::UserId => "user_id",
            Column::Country => "country",
            Column::Region => "region",
            Column::ProductId => "product_id",
            Column::ProductName => "product_name",
            Column::Category => "category",
            Column::Price => "price",
            Column::Quantity => "quantity",
            Column::TotalPrice => "total_price",
            Column::StockQuantity => "stock_quantity",
            Column::AddedDate => "added_date",
        }
    }

    fn from_header(header: &str) -> Option<Column> {
        let normalized = header.trim().to_lowercase();
        Column::ALL.into_iter().find(|c| c.name() == normalized)
    }
}

/// Header-driven lookup from logical column to field index
///
/// Built once per run. Header names are trimmed and compared
/// case-insensitively; unknown headers are ignored and a repeated header
/// resolves to its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [Option<usize>; Column::ALL.len()],
}

impl ColumnMap {
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::default();
        for (idx, header) in headers.into_iter().enumerate() {
            if let Some(column) = Column::from_header(header.as_ref()) {
                map.indices[column as usize] = Some(idx);
            }
        }
        map
    }

    pub fn index(&self, column: Column) -> Option<usize> {
        self.indices[column as usize]
    }

    /// Columns the header did not declare
    pub fn missing(&self) -> Vec<&'static str> {
        Column::ALL
            .into_iter()
            .filter(|c| self.index(*c).is_none())
            .map(|c| c.name())
            .collect()
    }

    fn field<'r>(&self, record: &'r StringRecord, column: Column) -> Option<&'r str> {
        self.index(column)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
    }
}

/// Accepted date layouts, tried in order
///
/// Month and day fields also accept a single digit (`3/4/2023`).
const DATE_FORMATS: [DateFormat; 5] = [
    DateFormat::Date("%Y-%m-%d"),
    DateFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    DateFormat::Date("%m/%d/%Y"),
    DateFormat::Date("%m-%d-%Y"),
    DateFormat::Date("%Y/%m/%d"),
];

enum DateFormat {
    Date(&'static str),
    DateTime(&'static str),
}

impl DateFormat {
    fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        match self {
            DateFormat::Date(fmt) => NaiveDate::parse_from_str(value, fmt)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN)),
            DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt).ok(),
        }
    }
}

/// First matching date layout wins; no match leaves the date unset
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|format| format.parse(value))
}

/// Decimal amount, or zero when the cell is not a number
pub fn parse_amount(value: &str) -> Amount {
    Amount::from_decimal_str(value)
        .ok()
        .or_else(|| value.trim().parse::<f64>().ok().and_then(Amount::from_f64))
        .unwrap_or_default()
}

/// Whole number, or zero when the cell is not an integer
pub fn parse_integer(value: &str) -> i64 {
    value.trim().parse().unwrap_or_default()
}

/// Convert one structurally valid row into a transaction
///
/// Never fails: missing columns and unparseable cells degrade to zero values.
pub fn parse_record(record: &StringRecord, columns: &ColumnMap, row: u64) -> Transaction {
    let text = |column| {
        columns
            .field(record, column)
            .map(str::to_string)
            .unwrap_or_default()
    };
    let amount = |column| columns.field(record, column).map(parse_amount).unwrap_or_default();
    let integer = |column| columns.field(record, column).map(parse_integer).unwrap_or_default();
    let date = |column| columns.field(record, column).and_then(parse_date);

    Transaction {
        row,
        transaction_id: text(Column::TransactionId),
        transaction_date: date(Column::TransactionDate),
        user_id: text(Column::UserId),
        country: text(Column::Country),
        region: text(Column::Region),
        product_id: text(Column::ProductId),
        product_name: text(Column::ProductName),
        category: text(Column::Category),
        price: amount(Column::Price),
        quantity: integer(Column::Quantity),
        total_price: amount(Column::TotalPrice),
        stock_quantity: integer(Column::StockQuantity),
        added_date: date(Column::AddedDate),
    }
}
