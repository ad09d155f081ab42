//! Dynamic SQL builder.
//!
//! `Sql` composes statements without manually tracking placeholder indices:
//! values are bound in order and rendered as `$1, $2, ...`.
//!
//! # Example
//!
//! ```ignore
//! use bookstore::sql;
//!
//! let mut q = sql("SELECT id, title FROM books");
//! q.push(" WHERE year = ").push_bind(2020);
//! q.push(" ORDER BY id ASC");
//!
//! let books: Vec<Book> = q.fetch_all_as(&conn).await?;
//! ```

mod builder;
mod exec;
mod value;


pub use builder::Sql;
pub use value::SqlValue;

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}
