//! Sort builder
//!
//! Resolves the caller's sort column and direction token into a [`SortSpec`].
//! With no column the record key is used ascending, so unsorted requests still
//! page deterministically.

use std::cmp::Ordering;
use std::fmt;

use super::direction::SortDirection;
use super::filter::non_empty;
use crate::error::Result;
use crate::fields::{Column, FieldRegistry};

/// A validated single-key ordering
pub struct SortSpec<'r, T> {
    column: Column<'r, T>,
    direction: SortDirection,
}

impl<'r, T> SortSpec<'r, T> {
    /// Order by an already validated column
    pub fn new(column: Column<'r, T>, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Column being ordered on
    #[must_use]
    pub fn column(&self) -> Column<'r, T> {
        self.column
    }

    /// Ordering direction
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two records under this ordering
    ///
    /// Records with equal keys compare equal; a stable sort keeps their
    /// original relative order in both directions.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = self.column.read(a).total_cmp(&self.column.read(b));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl<T> Clone for SortSpec<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SortSpec<'_, T> {}

impl<T> fmt::Debug for SortSpec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortSpec")
            .field("column", &self.column.name())
            .field("direction", &self.direction)
            .finish()
    }
}

/// Build the ordering for a request
///
/// An absent or empty column selects the record key ascending, whatever the
/// direction token says.
///
/// # Errors
///
/// [`Error::InvalidColumn`](crate::Error::InvalidColumn) when a column is named
/// but is not a registered field.
pub fn build_sort<'r, T>(
    registry: &'r FieldRegistry<T>,
    column: Option<&str>,
    order: Option<&str>,
) -> Result<SortSpec<'r, T>> {
    match non_empty(column) {
        None => Ok(SortSpec::new(registry.key(), SortDirection::Ascending)),
        Some(name) => {
            let column = registry.validate(name)?;
            Ok(SortSpec::new(column, SortDirection::from_token(order)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::error::Error;
    use crate::fields::Record;

    fn category(id: i64, label: &str, total_books: Option<i64>) -> Category {
        Category {
            id,
            label: label.to_string(),
            total_books,
        }
    }

    #[test]
    fn test_default_is_key_ascending() {
        let spec = build_sort(Category::registry(), None, Some("desc")).unwrap();
        assert_eq!(spec.column().name(), "id");
        assert_eq!(spec.direction(), SortDirection::Ascending);

        let spec = build_sort(Category::registry(), Some(""), None).unwrap();
        assert_eq!(spec.column().name(), "id");
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let err = build_sort(Category::registry(), Some("books"), None).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { .. }));
    }

    #[test]
    fn test_unknown_direction_is_ascending() {
        let spec = build_sort(Category::registry(), Some("label"), Some("upward")).unwrap();
        assert_eq!(spec.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_descending_is_stable() {
        let spec = build_sort(Category::registry(), Some("totalBooks"), Some("DESC")).unwrap();
        let mut categories = vec![
            category(1, "a", Some(3)),
            category(2, "b", Some(5)),
            category(3, "c", Some(3)),
            category(4, "d", None),
            category(5, "e", Some(5)),
        ];
        categories.sort_by(|a, b| spec.compare(a, b));
        let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 5, 1, 3, 4]);
    }

    #[test]
    fn test_resorting_sorted_set_keeps_order() {
        let spec = build_sort(Category::registry(), Some("label"), None).unwrap();
        let mut categories = vec![
            category(3, "Fantasy", None),
            category(1, "Fantasy", None),
            category(2, "History", None),
        ];
        categories.sort_by(|a, b| spec.compare(a, b));
        let first: Vec<i64> = categories.iter().map(|c| c.id).collect();
        categories.sort_by(|a, b| spec.compare(a, b));
        let second: Vec<i64> = categories.iter().map(|c| c.id).collect();
        assert_eq!(first, vec![3, 1, 2]);
        assert_eq!(first, second);
    }
}
