//! Row mapping traits and utilities

use crate::error::{StoreError, StoreResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust struct.
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> StoreResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning StoreError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> StoreResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Read the value at `idx` of a fixed projection, naming `column` in the
    /// decode error if the scan fails.
    fn try_get_at<T>(&self, idx: usize, column: &str) -> StoreResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> StoreResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| StoreError::decode(column, e.to_string()))
    }

    fn try_get_at<T>(&self, idx: usize, column: &str) -> StoreResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(idx)
            .map_err(|e| StoreError::decode(column, e.to_string()))
    }
}

