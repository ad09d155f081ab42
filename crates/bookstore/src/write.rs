//! Insert and full-row update statement assembly.

use crate::book::{BOOKS_TABLE, BookInput};
use crate::sql::{Sql, SqlValue};

/// Settable columns, in bind order for both `INSERT` and `UPDATE`.
pub const SETTABLE_COLUMNS: [&str; 16] = [
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
];

impl BookInput {
    /// Values for [`SETTABLE_COLUMNS`], in the same order.
    fn bind_values(&self) -> [SqlValue; 16] {
        [
            self.title.as_str().into(),
            self.author.as_str().into(),
            self.isbn.as_str().into(),
            self.year.into(),
            self.price.into(),
            self.category.as_str().into(),
            self.original_price.into(),
            self.discount.into(),
            self.cover_image.as_str().into(),
            self.rating.into(),
            self.reviews_count.into(),
            self.is_new.into(),
            self.pages.into(),
            self.language.as_str().into(),
            self.publisher.as_str().into(),
            self.description.as_str().into(),
        ]
    }
}

/// `INSERT INTO books (...) VALUES ($1, ..., $16) RETURNING id, created_at, updated_at`
pub fn insert_statement(input: &BookInput) -> Sql {
    let columns = SETTABLE_COLUMNS.join(", ");
    let mut q = Sql::new(format!("INSERT INTO {BOOKS_TABLE} ({columns}) VALUES ("));
    for (i, value) in input.bind_values().into_iter().enumerate() {
        if i > 0 {
            q.push(", ");
        }
        q.push_bind(value);
    }
    q.push(") RETURNING id, created_at, updated_at");
    q.tagged("books.insert")
}

/// Full-row replace of book `id`.
///
/// Every settable column is bound as `$1..$16`, the identifier is `$17`, and
/// `updated_at` is refreshed server-side without a placeholder. A statement
/// that matches no row returns no `RETURNING` row.
pub fn update_statement(input: &BookInput, id: i32) -> Sql {
    let mut q = Sql::new(format!("UPDATE {BOOKS_TABLE} SET "));
    let columns = SETTABLE_COLUMNS.iter().zip(input.bind_values());
    for (i, (column, value)) in columns.enumerate() {
        if i > 0 {
            q.push(", ");
        }
        q.push(column).push(" = ").push_bind(value);
    }
    q.push(", updated_at = NOW() WHERE id = ")
        .push_bind(id)
        .push(" RETURNING id, created_at, updated_at");
    q.tagged("books.update")
}
