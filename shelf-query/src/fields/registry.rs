//! Per-record-type field registry
//!
//! A [`FieldRegistry`] lists the scalar fields a record type exposes to
//! callers. It is the only way to obtain a [`Column`], so every caller-supplied
//! column name passes through [`FieldRegistry::validate`] before it can shape a
//! predicate or an ordering.
//!
//! # Example
//!
//! ```rust
//! use shelf_query::fields::{FieldKind, FieldRegistry};
//!
//! struct Shelf {
//!     id: i64,
//!     label: String,
//! }
//!
//! let registry = FieldRegistry::keyed("Shelf", "id", FieldKind::Integer, |s: &Shelf| s.id.into())
//!     .field("label", FieldKind::Text, |s| s.label.as_str().into())
//!     .build();
//!
//! let column = registry.validate("LABEL").unwrap();
//! assert_eq!(column.name(), "label");
//! assert!(registry.validate("password").is_err());
//! ```

use std::fmt;

use super::value::{FieldKind, FieldValue, MatchStrategy};
use crate::error::{Error, Result};

/// Reads one field out of a record
pub type Accessor<T> = fn(&T) -> FieldValue;

/// Registration entry for one scalar field
pub struct FieldDescriptor<T> {
    name: &'static str,
    storage: &'static str,
    kind: FieldKind,
    strategy: MatchStrategy,
    accessor: Accessor<T>,
    dupe_checked: bool,
    identity: bool,
}

impl<T> FieldDescriptor<T> {
    fn new(name: &'static str, kind: FieldKind, accessor: Accessor<T>) -> Self {
        Self {
            name,
            storage: name,
            kind,
            strategy: kind.strategy(),
            accessor,
            dupe_checked: false,
            identity: false,
        }
    }
}

/// A validated column of record type `T`
///
/// Only a [`FieldRegistry`] hands these out, so holding a `Column` proves the
/// name was checked against the record's fields.
pub struct Column<'r, T> {
    descriptor: &'r FieldDescriptor<T>,
}

impl<'r, T> Column<'r, T> {
    /// Canonical (wire) name of the field
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Column name in the backing store
    #[must_use]
    pub fn storage_name(&self) -> &'static str {
        self.descriptor.storage
    }

    /// Field kind
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.descriptor.kind
    }

    /// Filter strategy fixed for this field at registration
    #[must_use]
    pub fn strategy(&self) -> MatchStrategy {
        self.descriptor.strategy
    }

    /// Whether the field is on the duplicate-check whitelist
    #[must_use]
    pub fn is_dupe_checked(&self) -> bool {
        self.descriptor.dupe_checked
    }

    /// Whether the field is part of the record's identity
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.descriptor.identity
    }

    /// Read this field from a record
    pub fn read(&self, record: &T) -> FieldValue {
        (self.descriptor.accessor)(record)
    }
}

// Manual impls: a derive would needlessly require `T: Clone`
impl<T> Clone for Column<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<'_, T> {}

impl<T> PartialEq for Column<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor)
    }
}

impl<T> fmt::Debug for Column<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.descriptor.name)
            .field("kind", &self.descriptor.kind)
            .finish()
    }
}

/// The exposed scalar fields of one record type
pub struct FieldRegistry<T> {
    record: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldRegistry<T> {
    /// Start a registry whose first field is the record key
    ///
    /// The key is the stable unique identifier used as the default sort.
    pub fn keyed(
        record: &'static str,
        key: &'static str,
        kind: FieldKind,
        accessor: Accessor<T>,
    ) -> FieldRegistryBuilder<T> {
        FieldRegistryBuilder {
            record,
            fields: vec![FieldDescriptor::new(key, kind, accessor)],
        }
    }

    /// Record type name used in error messages and logs
    #[must_use]
    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Resolve a caller-supplied column name, ignoring ASCII case
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColumn`] when no registered field matches.
    pub fn validate(&self, name: &str) -> Result<Column<'_, T>> {
        self.lookup(name).ok_or_else(|| {
            tracing::debug!(record = self.record, column = name, "Rejected unknown column");
            Error::invalid_column(self.record, name)
        })
    }

    /// Resolve a column that is also on the duplicate-check whitelist
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColumn`] when the field is unknown or not whitelisted.
    pub fn validate_dupe_field(&self, name: &str) -> Result<Column<'_, T>> {
        match self.lookup(name) {
            Some(column) if column.is_dupe_checked() => Ok(column),
            _ => {
                tracing::debug!(
                    record = self.record,
                    column = name,
                    "Rejected column for duplicate check"
                );
                Err(Error::invalid_column(self.record, name))
            }
        }
    }

    /// The record key column
    #[must_use]
    pub fn key(&self) -> Column<'_, T> {
        Column {
            descriptor: &self.fields[0],
        }
    }

    /// All registered columns, key first
    pub fn columns(&self) -> impl Iterator<Item = Column<'_, T>> {
        self.fields.iter().map(|descriptor| Column { descriptor })
    }

    /// Columns that together identify a record for whole-record duplicate
    /// checks, in registration order
    pub fn identity_columns(&self) -> impl Iterator<Item = Column<'_, T>> {
        self.columns().filter(|column| column.is_identity())
    }

    fn lookup(&self, name: &str) -> Option<Column<'_, T>> {
        self.fields
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|descriptor| Column { descriptor })
    }
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("record", &self.record)
            .field(
                "fields",
                &self.fields.iter().map(|d| d.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`FieldRegistry`]
pub struct FieldRegistryBuilder<T> {
    record: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> FieldRegistryBuilder<T> {
    /// Register a scalar field
    ///
    /// A name that repeats an earlier one (ignoring case) replaces it.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind, accessor: Accessor<T>) -> Self {
        let descriptor = FieldDescriptor::new(name, kind, accessor);
        match self
            .fields
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))
        {
            Some(index) => self.fields[index] = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    /// Set the storage column name of the most recently registered field
    #[must_use]
    pub fn stored_as(mut self, storage: &'static str) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.storage = storage;
        }
        self
    }

    /// Put an already registered field on the duplicate-check whitelist
    ///
    /// Unknown names are ignored.
    #[must_use]
    pub fn dupe_checked(mut self, name: &'static str) -> Self {
        if let Some(d) = self
            .fields
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(name))
        {
            d.dupe_checked = true;
        } else {
            tracing::warn!(
                record = self.record,
                field = name,
                "Duplicate-check field is not registered"
            );
        }
        self
    }

    /// Add an already registered field to the record's identity
    ///
    /// Two records whose identity fields are all equal, nulls included, are
    /// duplicates of each other. Unknown names are ignored.
    #[must_use]
    pub fn identity(mut self, name: &'static str) -> Self {
        if let Some(d) = self
            .fields
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(name))
        {
            d.identity = true;
        } else {
            tracing::warn!(
                record = self.record,
                field = name,
                "Identity field is not registered"
            );
        }
        self
    }

    /// Finish the registry
    #[must_use]
    pub fn build(self) -> FieldRegistry<T> {
        FieldRegistry {
            record: self.record,
            fields: self.fields,
        }
    }
}
