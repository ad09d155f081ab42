//! # bookstore
//!
//! Parameterized query builder and row mapper for the bookstore catalog.
//!
//! - **Filter assembly**: optional query inputs become a `WHERE` fragment with
//!   `$1..$N` placeholders numbered in assembly order
//! - **Row mapping**: every read selects the fixed [`BOOK_COLUMNS`] projection
//!   and nullable columns map to `Option` fields
//! - **Full-row writes**: insert and replace-by-id bind all 16 settable columns
//! - **Injected storage**: every operation takes `&impl GenericClient`, backed
//!   by a bounded `deadpool-postgres` pool
//!
//! ```ignore
//! use bookstore::{Book, BookFilter, PoolConfig, create_pool};
//!
//! let pool = create_pool(&database_url, &PoolConfig::default())?;
//! let client = pool.get().await?;
//!
//! let filter = BookFilter::parse(Some("2020"), Some("fiction"))?;
//! let books = Book::fetch_filtered(&client, &filter).await?;
//! ```

pub mod book;
pub mod client;
pub mod error;
pub mod filter;
pub mod pool;
pub mod row;
pub mod sql;
pub mod store;
pub mod write;

pub use book::{BOOK_COLUMNS, BOOKS_TABLE, Book, BookInput};
pub use client::GenericClient;
pub use error::{StoreError, StoreResult};
pub use filter::BookFilter;
pub use pool::{PoolConfig, create_pool, create_pool_with_pg_config, spawn_reaper, trim_idle};
pub use row::{FromRow, RowExt};
pub use sql::{Sql, SqlValue, sql};
pub use store::{parse_id, parse_limit, ping};

// Re-export the pool types so callers need not depend on deadpool directly.
pub use deadpool_postgres::{Pool, PoolError};
