//! Field validation
//!
//! Record types describe their sortable and filterable fields once, in a
//! [`FieldRegistry`] built at startup. Caller-supplied column names are checked
//! against that registry; nothing else can produce the [`Column`] values the
//! filter and sort builders accept.
//!
//! # Example
//!
//! ```rust
//! use shelf_query::catalog::Book;
//! use shelf_query::fields::validate_field;
//!
//! assert_eq!(validate_field::<Book>("AUTHORNAME").unwrap(), "authorName");
//! assert!(validate_field::<Book>("doesNotExist").is_err());
//! ```

mod registry;
mod value;

pub use registry::{Accessor, Column, FieldDescriptor, FieldRegistry, FieldRegistryBuilder};
pub use value::{FieldKind, FieldValue, MatchStrategy};

use crate::error::Result;

/// A record type that can be paged, sorted and filtered
///
/// Implementors keep their registry in a process-wide static so it is built
/// exactly once:
///
/// ```rust
/// use std::sync::LazyLock;
/// use shelf_query::fields::{FieldKind, FieldRegistry, Record};
///
/// #[derive(Clone)]
/// struct Publisher {
///     id: i64,
///     name: String,
/// }
///
/// static PUBLISHER_FIELDS: LazyLock<FieldRegistry<Publisher>> = LazyLock::new(|| {
///     FieldRegistry::keyed("Publisher", "id", FieldKind::Integer, |p: &Publisher| p.id.into())
///         .field("name", FieldKind::Text, |p| p.name.as_str().into())
///         .build()
/// });
///
/// impl Record for Publisher {
///     fn registry() -> &'static FieldRegistry<Self> {
///         &PUBLISHER_FIELDS
///     }
/// }
/// ```
pub trait Record: Sized + Send + Sync + 'static {
    /// The field registry of this record type
    fn registry() -> &'static FieldRegistry<Self>;
}

/// Check a column name against a record type, returning its canonical name
///
/// # Errors
///
/// [`Error::InvalidColumn`](crate::Error::InvalidColumn) when the name does not
/// match any registered field, ignoring ASCII case.
pub fn validate_field<T: Record>(name: &str) -> Result<&'static str> {
    T::registry().validate(name).map(|column| column.name())
}
