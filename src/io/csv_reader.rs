use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;

use super::error::IoError;
use super::parse::{ColumnMap, parse_record};
use crate::domain::Transaction;

/// Async stream of transactions from CSV input
///
/// The header row is consumed on construction and turned into a
/// [`ColumnMap`]. Each later row yields either a parsed transaction or the
/// structural error that prevented reading it.
pub struct CsvTransactionStream {
    inner: Pin<Box<dyn Stream<Item = Result<Transaction, IoError>> + Send>>,
    columns: ColumnMap,
}

impl CsvTransactionStream {
    /// Create a transaction stream from an async reader, reading the header
    ///
    /// Fails when the header cannot be read or declares no columns.
    pub async fn new<R>(reader: R) -> Result<Self, IoError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut csv_reader = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::All)
            .flexible(true)
            .create_reader(reader);

        let headers = csv_reader.headers().await?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(IoError::MissingHeader);
        }

        let columns = ColumnMap::from_headers(headers.iter());
        let missing = columns.missing();
        if !missing.is_empty() {
            debug!(?missing, "Header does not declare every known column");
        }

        let row_columns = columns.clone();
        let stream = csv_reader
            .into_records()
            .enumerate()
            .map(move |(idx, result)| {
                result
                    .map_err(IoError::from)
                    .map(|record| parse_record(&record, &row_columns, idx as u64 + 1))
            });

        Ok(Self {
            inner: Box::pin(stream),
            columns,
        })
    }

    /// Create a transaction stream from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let stream = CsvTransactionStream::from_file("transactions.csv").await?;
    /// ```
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Self::new(file.compat()).await
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }
}

impl Stream for CsvTransactionStream {
    type Item = Result<Transaction, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;
    use crate::io::parse::Column;
    use futures::io::Cursor;

    async fn stream_of(data: &'static [u8]) -> Result<CsvTransactionStream, IoError> {
        CsvTransactionStream::new(Cursor::new(data)).await
    }

    #[tokio::test]
    async fn reads_valid_csv_stream() {
        let csv_data = b"\
transaction_id,country,product_name,quantity,total_price
T1,USA,Laptop,2,1000
T2,UK,Phone,1,800.50
";
        let mut stream = stream_of(csv_data).await.unwrap();

        let tx1 = stream.next().await.unwrap().unwrap();
        assert_eq!(tx1.row, 1);
        assert_eq!(tx1.transaction_id, "T1");
        assert_eq!(tx1.country, "USA");
        assert_eq!(tx1.quantity, 2);
        assert_eq!(tx1.total_price, Amount::from_raw(10_000_000));

        let tx2 = stream.next().await.unwrap().unwrap();
        assert_eq!(tx2.row, 2);
        assert_eq!(tx2.product_name, "Phone");
        assert_eq!(tx2.total_price, Amount::from_raw(8_005_000));

        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn header_is_case_insensitive_any_order() {
        let csv_data = b"\
 Total_Price ,PRODUCT_NAME,Country
12.5,Mouse,France
";
        let mut stream = stream_of(csv_data).await.unwrap();
        assert_eq!(stream.columns().index(Column::Country), Some(2));

        let tx = stream.next().await.unwrap().unwrap();
        assert_eq!(tx.country, "France");
        assert_eq!(tx.product_name, "Mouse");
        assert_eq!(tx.total_price, Amount::from_raw(125_000));
    }

    #[tokio::test]
    async fn tolerates_ragged_rows() {
        let csv_data = b"\
country,product_name,total_price
USA,Laptop
UK,Phone,800,unexpected,extra
";
        let stream = stream_of(csv_data).await.unwrap();
        let rows: Vec<_> = stream.collect().await;

        assert_eq!(rows.len(), 2);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.total_price, Amount::ZERO);
        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.total_price, Amount::from_raw(8_000_000));
    }

    #[tokio::test]
    async fn tolerates_stray_quotes() {
        let csv_data = b"\
country,product_name,total_price
USA,12\" Monitor,150
";
        let mut stream = stream_of(csv_data).await.unwrap();

        let tx = stream.next().await.unwrap().unwrap();
        assert_eq!(tx.product_name, "12\" Monitor");
        assert_eq!(tx.total_price, Amount::from_raw(1_500_000));
    }

    #[tokio::test]
    async fn malformed_row_yields_error_and_stream_continues() {
        let csv_data = b"\
country,product_name,total_price
USA,Laptop,10
UK,\xff\xfe,20
FR,Tablet,30
";
        let stream = stream_of(csv_data).await.unwrap();
        let rows: Vec<_> = stream.collect().await;

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        let err = rows[1].as_ref().unwrap_err();
        assert!(!err.is_fatal());
        let last = rows[2].as_ref().unwrap();
        assert_eq!(last.row, 3);
        assert_eq!(last.product_name, "Tablet");
    }

    #[tokio::test]
    async fn handles_header_only_csv() {
        let mut stream = stream_of(b"country,product_name\n").await.unwrap();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_input_is_missing_header() {
        let result = stream_of(b"").await;
        assert!(matches!(result, Err(IoError::MissingHeader)));
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let result = CsvTransactionStream::from_file("/definitely/not/here.csv").await;

        match result {
            Err(err @ IoError::Io(_)) => assert!(err.is_fatal()),
            Err(other) => panic!("Expected Io error, got {other}"),
            Ok(_) => panic!("Expected missing file to fail"),
        }
    }
}
