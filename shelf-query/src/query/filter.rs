//! Filter builder
//!
//! Turns a caller-supplied column and free-text query into at most one
//! [`Predicate`]. The strategy comes from the column's registration: text
//! columns match by case-insensitive containment, everything else by exact
//! match on the value's string rendering.

use std::fmt;

use crate::error::Result;
use crate::fields::{Column, FieldRegistry, MatchStrategy};

/// A single-column inclusion test
pub struct Predicate<'r, T> {
    column: Column<'r, T>,
    query: String,
    // Lowercased query, precomputed for containment tests
    needle: String,
}

impl<'r, T> Predicate<'r, T> {
    /// Build a predicate over an already validated column
    pub fn new(column: Column<'r, T>, query: impl Into<String>) -> Self {
        let query = query.into();
        let needle = query.to_lowercase();
        Self {
            column,
            query,
            needle,
        }
    }

    /// Column the predicate tests
    #[must_use]
    pub fn column(&self) -> Column<'r, T> {
        self.column
    }

    /// Query text exactly as supplied
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matching strategy of the column
    #[must_use]
    pub fn strategy(&self) -> MatchStrategy {
        self.column.strategy()
    }

    /// Whether a record passes the filter
    ///
    /// Null field values never match.
    pub fn matches(&self, record: &T) -> bool {
        let Some(value) = self.column.read(record).render() else {
            return false;
        };
        match self.strategy() {
            MatchStrategy::Contains => value.to_lowercase().contains(&self.needle),
            MatchStrategy::Equals => value == self.query,
        }
    }
}

impl<T> Clone for Predicate<'_, T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            query: self.query.clone(),
            needle: self.needle.clone(),
        }
    }
}

impl<T> fmt::Debug for Predicate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("column", &self.column.name())
            .field("strategy", &self.strategy())
            .field("query", &self.query)
            .finish()
    }
}

/// Build the filter for a request
///
/// Returns `Ok(None)` when either the column or the query is absent or empty.
///
/// # Errors
///
/// [`Error::InvalidColumn`](crate::Error::InvalidColumn) when a column is named
/// but is not a registered field.
pub fn build_filter<'r, T>(
    registry: &'r FieldRegistry<T>,
    column: Option<&str>,
    query: Option<&str>,
) -> Result<Option<Predicate<'r, T>>> {
    let (Some(column), Some(query)) = (non_empty(column), non_empty(query)) else {
        return Ok(None);
    };
    let column = registry.validate(column)?;
    Ok(Some(Predicate::new(column, query)))
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
