//! The catalog record and its row mapper.

use crate::error::{StoreError, StoreResult};
use crate::row::{FromRow, RowExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Table every catalog statement targets.
pub const BOOKS_TABLE: &str = "books";

/// The fixed projection read by every query against [`BOOKS_TABLE`].
///
/// Order is significant: [`Book::from_row`] scans columns by position.
pub const BOOK_COLUMNS: [&str; 19] = [
    "id",
    "title",
    "author",
    "isbn",
    "year",
    "price",
    "category",
    "original_price",
    "discount",
    "cover_image",
    "rating",
    "reviews_count",
    "is_new",
    "pages",
    "language",
    "publisher",
    "description",
    "created_at",
    "updated_at",
];

/// `BOOK_COLUMNS` joined for use in a `SELECT` list.
pub fn projection() -> String {
    BOOK_COLUMNS.join(", ")
}

/// A catalog record as stored.
///
/// `original_price` and `pages` are nullable in storage and are only ever
/// populated by the row mapper (or echoed from a caller's input).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub discount: i32,
    pub cover_image: String,
    pub rating: f64,
    pub reviews_count: i32,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    pub language: String,
    pub publisher: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The settable fields of a [`Book`], as accepted from callers.
///
/// Fields missing from a request body take their zero value; unknown fields
/// (including `id` and the timestamps) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
    pub price: f64,
    pub category: String,
    pub original_price: Option<f64>,
    pub discount: i32,
    pub cover_image: String,
    pub rating: f64,
    pub reviews_count: i32,
    pub is_new: bool,
    pub pages: Option<i32>,
    pub language: String,
    pub publisher: String,
    pub description: String,
}

impl Book {
    /// Echo `input` back as a stored record with storage-assigned values.
    pub fn from_input(
        id: i32,
        input: BookInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let BookInput {
            title,
            author,
            isbn,
            year,
            price,
            category,
            original_price,
            discount,
            cover_image,
            rating,
            reviews_count,
            is_new,
            pages,
            language,
            publisher,
            description,
        } = input;

        Self {
            id,
            title,
            author,
            isbn,
            year,
            price,
            category,
            original_price,
            discount,
            cover_image,
            rating,
            reviews_count,
            is_new,
            pages,
            language,
            publisher,
            description,
            created_at,
            updated_at,
        }
    }
}

/// Sequential reader over a row positioned at [`BOOK_COLUMNS`].
struct ProjectionCursor<'r> {
    row: &'r Row,
    pos: usize,
}

impl<'r> ProjectionCursor<'r> {
    fn new(row: &'r Row) -> StoreResult<Self> {
        if row.len() != BOOK_COLUMNS.len() {
            let (expected, got) = (BOOK_COLUMNS.len(), row.len());
            let message = format!("expected {expected} projected columns, got {got}");
            return Err(StoreError::decode(BOOKS_TABLE, message));
        }
        Ok(Self { row, pos: 0 })
    }

    fn read<T>(&mut self) -> StoreResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        let value = self.row.try_get_at(self.pos, BOOK_COLUMNS[self.pos])?;
        self.pos += 1;
        Ok(value)
    }
}

impl FromRow for Book {
    // Field initializers evaluate top to bottom, which is the projection order.
    fn from_row(row: &Row) -> StoreResult<Self> {
        let mut col = ProjectionCursor::new(row)?;
        Ok(Self {
            id: col.read()?,
            title: col.read()?,
            author: col.read()?,
            isbn: col.read()?,
            year: col.read()?,
            price: col.read()?,
            category: col.read()?,
            original_price: col.read::<Option<f64>>()?,
            discount: col.read()?,
            cover_image: col.read()?,
            rating: col.read()?,
            reviews_count: col.read()?,
            is_new: col.read()?,
            pages: col.read::<Option<i32>>()?,
            language: col.read()?,
            publisher: col.read()?,
            description: col.read()?,
            created_at: col.read()?,
            updated_at: col.read()?,
        })
    }
}
