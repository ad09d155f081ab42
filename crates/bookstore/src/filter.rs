//! Filter clause assembly for catalog listings.
//!
//! Raw optional query inputs are validated into a [`BookFilter`], which then
//! renders a `WHERE` fragment whose placeholders are numbered in assembly
//! order (year first, then category).

use crate::error::{StoreError, StoreResult};
use crate::sql::Sql;

/// Validated listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Exact publication year.
    pub year: Option<i32>,
    /// Case-insensitive partial match on category.
    pub category: Option<String>,
}

impl BookFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Empty strings count as absent. A `year` that is not an integer fails
    /// with [`StoreError::InvalidInput`].
    pub fn parse(year: Option<&str>, category: Option<&str>) -> StoreResult<Self> {
        let year = year
            .filter(|y| !y.is_empty())
            .map(str::parse::<i32>)
            .transpose()
            .map_err(|_| StoreError::invalid_input("Invalid year format"))?;
        let category = category.filter(|c| !c.is_empty()).map(str::to_string);

        Ok(Self { year, category })
    }

    /// `true` when no filter was supplied.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.category.is_none()
    }

    /// Render the `WHERE` fragment (with a leading space), or an empty
    /// fragment when no filter is set.
    pub fn to_where(&self) -> Sql {
        if self.is_empty() {
            return Sql::empty();
        }

        let mut clauses = Vec::new();

        if let Some(year) = self.year {
            let mut c = Sql::empty();
            c.push("year = ").push_bind(year);
            clauses.push(c);
        }

        if let Some(category) = &self.category {
            let mut c = Sql::empty();
            let pattern = contains_pattern(category);
            c.push("category ILIKE ").push_bind(pattern);
            clauses.push(c);
        }

        let mut out = Sql::new(" WHERE ");
        out.push_joined(clauses, " AND ");
        out
    }
}

/// Wrap `value` in `%...%`, escaping LIKE metacharacters so they match literally.
pub fn contains_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}
