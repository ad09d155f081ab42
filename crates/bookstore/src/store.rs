//! Catalog operations.
//!
//! Every operation takes the storage handle explicitly (`&impl GenericClient`)
//! and runs a single statement; atomicity is whatever PostgreSQL gives that
//! statement.

use crate::book::{BOOKS_TABLE, Book, BookInput, projection};
use crate::client::GenericClient;
use crate::error::{StoreError, StoreResult};
use crate::filter::{BookFilter, contains_pattern};
use crate::row::RowExt;
use crate::sql::{Sql, sql};
use crate::write::{insert_statement, update_statement};
use chrono::{DateTime, Utc};

/// Number of books returned by [`Book::featured`].
pub const FEATURED_LIMIT: i64 = 10;

/// Default page size of [`Book::newest`].
pub const DEFAULT_NEW_LIMIT: i64 = 5;

const NOT_FOUND: &str = "book not found";

fn select_books() -> Sql {
    sql(format!("SELECT {} FROM {BOOKS_TABLE}", projection()))
}

/// Parse the `limit` query value of [`Book::newest`].
///
/// Absent or empty means [`DEFAULT_NEW_LIMIT`]; anything that is not a
/// non-negative integer is [`StoreError::InvalidInput`].
pub fn parse_limit(raw: Option<&str>) -> StoreResult<i64> {
    match raw.filter(|l| !l.is_empty()) {
        None => Ok(DEFAULT_NEW_LIMIT),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(n),
            _ => Err(StoreError::invalid_input("Invalid limit format")),
        },
    }
}

/// Parse a path identifier.
pub fn parse_id(raw: &str) -> StoreResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| StoreError::invalid_input("Invalid book id"))
}

impl Book {
    /// All books matching `filter`, ordered by id.
    pub async fn fetch_filtered(
        conn: &impl GenericClient,
        filter: &BookFilter,
    ) -> StoreResult<Vec<Book>> {
        let mut q = select_books().tagged("books.list");
        q.push_sql(filter.to_where());
        q.push(" ORDER BY id ASC");
        q.fetch_all_as(conn).await
    }

    /// One book by id, or [`StoreError::NotFound`].
    pub async fn fetch_by_id(conn: &impl GenericClient, id: i32) -> StoreResult<Book> {
        let mut q = select_books().tagged("books.get");
        q.push(" WHERE id = ").push_bind(id);
        q.fetch_opt_as(conn)
            .await?
            .ok_or_else(|| StoreError::not_found(NOT_FOUND))
    }

    /// Books whose title or author contains `term` (case-insensitive), best
    /// rated first.
    pub async fn search(conn: &impl GenericClient, term: &str) -> StoreResult<Vec<Book>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(StoreError::invalid_input("Search query 'q' is required"));
        }

        let pattern = contains_pattern(&term.to_lowercase());
        let mut q = select_books().tagged("books.search");
        q.push(" WHERE LOWER(title) LIKE ")
            .push_bind(pattern.as_str())
            .push(" OR LOWER(author) LIKE ")
            .push_bind(pattern)
            .push(" ORDER BY rating DESC");
        q.fetch_all_as(conn).await
    }

    /// Top-rated books, ties broken by review count.
    pub async fn featured(conn: &impl GenericClient) -> StoreResult<Vec<Book>> {
        let mut q = select_books().tagged("books.featured");
        q.push(" ORDER BY rating DESC, reviews_count DESC")
            .limit(FEATURED_LIMIT);
        q.fetch_all_as(conn).await
    }

    /// Books with a discount, largest discount first.
    pub async fn discounted(conn: &impl GenericClient) -> StoreResult<Vec<Book>> {
        let mut q = select_books().tagged("books.discounted");
        q.push(" WHERE discount > 0 ORDER BY discount DESC");
        q.fetch_all_as(conn).await
    }

    /// The `limit` most recently created books.
    pub async fn newest(conn: &impl GenericClient, limit: i64) -> StoreResult<Vec<Book>> {
        let mut q = select_books().tagged("books.new");
        q.push(" ORDER BY created_at DESC").limit(limit);
        q.fetch_all_as(conn).await
    }

    /// Distinct non-empty categories, ascending.
    pub async fn categories(conn: &impl GenericClient) -> StoreResult<Vec<String>> {
        let mut q = sql(format!("SELECT DISTINCT category FROM {BOOKS_TABLE}"));
        q.push(" WHERE category IS NOT NULL AND category != '' ORDER BY category ASC");
        let rows = q.tagged("books.categories").fetch_all(conn).await?;
        rows.iter()
            .map(|row| row.try_get_column::<String>("category"))
            .collect()
    }

    /// Delete book `id`; [`StoreError::NotFound`] if nothing was deleted.
    pub async fn delete_by_id(conn: &impl GenericClient, id: i32) -> StoreResult<()> {
        let mut q = sql(format!("DELETE FROM {BOOKS_TABLE} WHERE id = "));
        q.push_bind(id);
        match q.tagged("books.delete").execute(conn).await? {
            0 => Err(StoreError::not_found(NOT_FOUND)),
            _ => Ok(()),
        }
    }
}

impl BookInput {
    /// Insert a new book and echo it back with the storage-assigned id and
    /// timestamps.
    pub async fn insert(self, conn: &impl GenericClient) -> StoreResult<Book> {
        let row = insert_statement(&self)
            .execute_returning(conn)
            .await?
            .ok_or_else(|| StoreError::decode(BOOKS_TABLE, "INSERT returned no row"))?;

        let id: i32 = row.try_get_column("id")?;
        let created_at: DateTime<Utc> = row.try_get_column("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get_column("updated_at")?;
        tracing::debug!(id, "book created");

        Ok(Book::from_input(id, self, created_at, updated_at))
    }

    /// Replace every settable field of book `id`.
    ///
    /// The returned record echoes `self` together with the storage-assigned
    /// id and timestamps; the other fields are not re-read after the write.
    pub async fn update_by_id(self, conn: &impl GenericClient, id: i32) -> StoreResult<Book> {
        let row = update_statement(&self, id)
            .execute_returning(conn)
            .await?
            .ok_or_else(|| StoreError::not_found(NOT_FOUND))?;

        let id: i32 = row.try_get_column("id")?;
        let created_at: DateTime<Utc> = row.try_get_column("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get_column("updated_at")?;
        tracing::debug!(id, "book updated");

        Ok(Book::from_input(id, self, created_at, updated_at))
    }
}

/// Round-trip a trivial statement; used by health checks.
pub async fn ping(conn: &impl GenericClient) -> StoreResult<()> {
    sql("SELECT 1").tagged("health.ping").fetch_all(conn).await?;
    Ok(())
}
