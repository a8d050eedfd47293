//! Record sources
//!
//! A [`RecordSource`] is the storage collaborator the engine pages over. It
//! receives a fully validated [`QueryPlan`] and answers with a count or a page;
//! the engine never hands it raw caller input.
//!
//! - [`InMemorySource`]: a `Vec` of records, evaluated in process
//! - `PgSource` (feature `database`): one PostgreSQL table through `sqlx`

mod error;
mod memory;
#[cfg(feature = "database")]
mod postgres;

use std::future::Future;

pub use error::{SourceError, SourceErrorKind, SourceOperation};
pub use memory::InMemorySource;
#[cfg(feature = "database")]
pub use postgres::PgSource;

use crate::query::{DupeProbe, QueryPlan};

/// Result type for record source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// An ordered, queryable collection of records
///
/// Uses return-position `impl Future` so implementations can be plain
/// `async fn`s without boxing.
///
/// # Example
///
/// ```rust,ignore
/// use shelf_query::query::{DupeProbe, QueryPlan};
/// use shelf_query::source::{RecordSource, SourceResult};
///
/// struct RemoteSource { /* client */ }
///
/// impl RecordSource<Book> for RemoteSource {
///     async fn count(&self, plan: &QueryPlan<'_, Book>) -> SourceResult<u64> {
///         // one COUNT request honouring plan.filter()
///         todo!()
///     }
///
///     async fn fetch(&self, plan: &QueryPlan<'_, Book>) -> SourceResult<Vec<Book>> {
///         // one windowed request honouring filter, sort and window
///         todo!()
///     }
///
///     async fn exists(&self, probe: &DupeProbe<'_, Book>) -> SourceResult<bool> {
///         todo!()
///     }
/// }
/// ```
pub trait RecordSource<T>: Send + Sync {
    /// Count records passing the plan's filter
    ///
    /// Ordering and window are ignored.
    fn count(&self, plan: &QueryPlan<'_, T>) -> impl Future<Output = SourceResult<u64>> + Send;

    /// Fetch the plan's window of filtered, stably sorted records
    ///
    /// Without a window every filtered record is returned.
    fn fetch(&self, plan: &QueryPlan<'_, T>) -> impl Future<Output = SourceResult<Vec<T>>> + Send;

    /// Whether any record matches the duplicate probe
    fn exists(&self, probe: &DupeProbe<'_, T>) -> impl Future<Output = SourceResult<bool>> + Send;
}
