//! Deferred query composition
//!
//! A [`QueryPlan`] collects the scope, filter, ordering and window of one
//! request.
//! Nothing runs until a [`RecordSource`](crate::source::RecordSource) is handed
//! the plan, so each store can translate it into whatever native operations
//! suit it.

use std::cmp::Ordering;
use std::fmt;

use super::direction::SortDirection;
use super::filter::Predicate;
use super::sort::SortSpec;
use super::window::Window;
use crate::fields::{Column, FieldRegistry, FieldValue};

/// A fixed equality condition that holds before the caller's filter
///
/// Used for listings nested under a parent record, such as the books of one
/// author. Null equals null.
pub struct Scope<'r, T> {
    column: Column<'r, T>,
    value: FieldValue,
}

impl<'r, T> Scope<'r, T> {
    /// Restrict to records whose `column` equals `value`
    pub fn new(column: Column<'r, T>, value: impl Into<FieldValue>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Scoped column
    pub fn column(&self) -> Column<'r, T> {
        self.column
    }

    /// Value the column must hold
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Whether a record is inside the scope
    pub fn matches(&self, record: &T) -> bool {
        self.column.read(record).total_cmp(&self.value) == Ordering::Equal
    }
}

impl<T> Clone for Scope<'_, T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            value: self.value.clone(),
        }
    }
}

impl<T> fmt::Debug for Scope<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("column", &self.column.name())
            .field("value", &self.value)
            .finish()
    }
}

/// Scope, filter, ordering and window intent for one record type
pub struct QueryPlan<'r, T> {
    registry: &'r FieldRegistry<T>,
    scope: Option<Scope<'r, T>>,
    filter: Option<Predicate<'r, T>>,
    sort: Option<SortSpec<'r, T>>,
    window: Option<Window>,
}

impl<'r, T> QueryPlan<'r, T> {
    /// Empty plan: every record, key order, no window
    pub fn new(registry: &'r FieldRegistry<T>) -> Self {
        Self {
            registry,
            scope: None,
            filter: None,
            sort: None,
            window: None,
        }
    }

    /// Replace the scope
    #[must_use]
    pub fn with_scope(self, scope: Option<Scope<'r, T>>) -> Self {
        Self { scope, ..self }
    }

    /// Replace the filter
    #[must_use]
    pub fn with_filter(self, filter: Option<Predicate<'r, T>>) -> Self {
        Self { filter, ..self }
    }

    /// Replace the ordering
    #[must_use]
    pub fn with_sort(self, sort: SortSpec<'r, T>) -> Self {
        Self {
            sort: Some(sort),
            ..self
        }
    }

    /// Replace the window
    #[must_use]
    pub fn with_window(self, window: Window) -> Self {
        Self {
            window: Some(window),
            ..self
        }
    }

    /// Registry of the record type
    pub fn registry(&self) -> &'r FieldRegistry<T> {
        self.registry
    }

    /// Scope, if any
    pub fn scope(&self) -> Option<&Scope<'r, T>> {
        self.scope.as_ref()
    }

    /// Filter, if any
    pub fn filter(&self) -> Option<&Predicate<'r, T>> {
        self.filter.as_ref()
    }

    /// Ordering to apply; the record key ascending when none was set
    pub fn sort(&self) -> SortSpec<'r, T> {
        self.sort
            .unwrap_or_else(|| SortSpec::new(self.registry.key(), SortDirection::Ascending))
    }

    /// Window, if any
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Whether a record is in scope and passes the filter
    pub fn admits(&self, record: &T) -> bool {
        self.scope.as_ref().map_or(true, |s| s.matches(record))
            && self.filter.as_ref().map_or(true, |p| p.matches(record))
    }
}

impl<T> Clone for QueryPlan<'_, T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry,
            scope: self.scope.clone(),
            filter: self.filter.clone(),
            sort: self.sort,
            window: self.window,
        }
    }
}

impl<T> fmt::Debug for QueryPlan<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPlan")
            .field("record", &self.registry.record_name())
            .field("scope", &self.scope)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("window", &self.window)
            .finish()
    }
}

/// Duplicate probe
///
/// Holds one or more column conditions. A record matches when every column
/// renders to the expected value, where an expected `None` matches only null.
/// The record whose key equals `exclude` never matches, and neither does
/// anything when there are no conditions.
pub struct DupeProbe<'r, T> {
    key: Column<'r, T>,
    conditions: Vec<(Column<'r, T>, Option<String>)>,
    exclude: Option<FieldValue>,
}

impl<'r, T> DupeProbe<'r, T> {
    /// Probe `column` for `value`
    pub fn new(
        registry: &'r FieldRegistry<T>,
        column: Column<'r, T>,
        value: impl Into<String>,
        exclude: Option<FieldValue>,
    ) -> Self {
        Self {
            key: registry.key(),
            conditions: vec![(column, Some(value.into()))],
            exclude,
        }
    }

    /// Probe for another record with the same identity fields as `record`
    ///
    /// `record` itself is excluded by its key.
    pub fn for_record(registry: &'r FieldRegistry<T>, record: &T) -> Self {
        let key = registry.key();
        Self {
            key,
            conditions: registry
                .identity_columns()
                .map(|column| (column, column.read(record).render()))
                .collect(),
            exclude: Some(key.read(record)),
        }
    }

    /// Record key column
    pub fn key(&self) -> Column<'r, T> {
        self.key
    }

    /// Columns and the rendered values they must hold
    pub fn conditions(&self) -> &[(Column<'r, T>, Option<String>)] {
        &self.conditions
    }

    /// Key of the record to skip
    pub fn exclude(&self) -> Option<&FieldValue> {
        self.exclude.as_ref()
    }

    /// Whether a record satisfies every condition
    pub fn matches(&self, record: &T) -> bool {
        if self.conditions.is_empty() {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if self.key.read(record) == *exclude {
                return false;
            }
        }
        self.conditions
            .iter()
            .all(|(column, expected)| column.read(record).render() == *expected)
    }
}

impl<T> fmt::Debug for DupeProbe<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DupeProbe")
            .field(
                "conditions",
                &self
                    .conditions
                    .iter()
                    .map(|(column, value)| (column.name(), value))
                    .collect::<Vec<_>>(),
            )
            .field("exclude", &self.exclude)
            .finish()
    }
}
