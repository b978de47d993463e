//! Row mapping traits and utilities

use crate::error::{SearchError, SearchResult};
use tokio_postgres::Row;

/// Trait for converting a result row into a Rust struct.
///
/// The row type defaults to [`tokio_postgres::Row`]; executors with their own
/// row representation (see [`QueryExecutor::Row`](crate::QueryExecutor::Row))
/// map through `FromRow<TheirRow>`.
///
/// # Example
///
/// ```ignore
/// use pgsearch::{FromRow, RowExt, SearchResult};
///
/// struct LoanRow {
///     id: i64,
///     status: Option<String>,
/// }
///
/// impl FromRow for LoanRow {
///     fn from_row(row: &tokio_postgres::Row) -> SearchResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             status: row.try_get_column("status")?,
///         })
///     }
/// }
/// ```
pub trait FromRow<R = Row>: Sized {
    /// Convert a result row into Self
    fn from_row(row: &R) -> SearchResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning SearchError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> SearchResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> SearchResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| SearchError::decode(column, e.to_string()))
    }
}
