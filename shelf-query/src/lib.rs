//! # shelf-query
//!
//! Paging, sorting and filtering for the bookshelf catalog.
//!
//! Every list endpoint hands its raw parameters (page index and size, an
//! optional sort column and direction, an optional filter column and query) to
//! a [`Pager`]. Column names are checked against the record type's field
//! registry before anything reaches the store, so untrusted input never shapes
//! a query directly.
//!
//! ## Features
//!
//! - **Field registry**: one per record type, built once; case-insensitive lookup
//! - **Filters**: containment for text columns, exact match for everything else
//! - **Sorting**: single column, stable, defaulting to the record key
//! - **Scopes**: fixed parent conditions such as the books of one author
//! - **Duplicates**: single whitelisted fields or whole-record identity
//! - **Paging**: one count and one windowed fetch per request
//! - **Sources**: in memory, or PostgreSQL via `sqlx` (feature `database`)
//! - **HTTP**: axum `IntoResponse` for results and errors (feature `http`)
//!
//! ## Example
//!
//! ```rust
//! use shelf_query::prelude::*;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let config = Config::default();
//! let pager = Pager::new(config.paging);
//!
//! let books = InMemorySource::new(Vec::<Book>::new());
//! let request = ListRequest::default()
//!     .with_page(0, 10)
//!     .with_sort("price", "desc")
//!     .with_filter("authorName", "tolkien");
//!
//! let page = pager.page(&books, &request).await?;
//! assert_eq!(page.total_pages(), 0);
//!
//! let rejected = pager
//!     .page(&books, &ListRequest::default().with_sort("doesNotExist", "asc"))
//!     .await;
//! assert!(matches!(rejected, Err(Error::InvalidColumn { .. })));
//! # Ok::<(), Error>(())
//! # }).unwrap();
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod fields;
pub mod observability;
pub mod query;
pub mod result;
pub mod source;

#[cfg(feature = "http")]
pub mod http;

pub use error::{Error, Result};
pub use result::{create_result, is_dupe_field, is_dupe_record, Pager, PagedResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::{Author, Book, Category};
    pub use crate::config::{Config, PagingConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::fields::{validate_field, FieldKind, FieldRegistry, FieldValue, Record};
    pub use crate::observability::init_tracing;
    pub use crate::query::{PageMeta, SortDirection};
    pub use crate::result::{
        create_result, is_dupe_field, is_dupe_record, DupeFieldRequest, ListRequest, PagedResult,
        Pager,
    };
    pub use crate::source::{InMemorySource, RecordSource, SourceError, SourceResult};

    #[cfg(feature = "database")]
    pub use crate::source::PgSource;
}
