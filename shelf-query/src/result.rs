//! Result assembler
//!
//! [`Pager`] runs one list request end to end: every caller-supplied input is
//! validated first, then the source is asked for exactly one filtered count and
//! one sorted, windowed fetch. The answer is a [`PagedResult`] or an error,
//! never a partial page.
//!
//! # Example
//!
//! ```rust
//! use shelf_query::catalog::Author;
//! use shelf_query::result::{create_result, ListRequest};
//! use shelf_query::source::InMemorySource;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let source = InMemorySource::new(vec![Author {
//!     id: 1,
//!     name: "J.R.R. Tolkien".to_string(),
//!     background: None,
//!     total_books: Some(4),
//! }]);
//!
//! let request = ListRequest::default().with_filter("name", "tolkien");
//! let page = create_result(&source, &request).await.unwrap();
//! assert_eq!(page.total_count(), 1);
//! assert_eq!(page.data()[0].id, 1);
//! # });
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PagingConfig;
use crate::error::Result;
use crate::fields::{FieldValue, Record};
use crate::query::{build_filter, build_sort, DupeProbe, PageMeta, QueryPlan, Scope, Window};
use crate::source::{RecordSource, SourceError};

/// Raw list parameters as a route handler receives them
///
/// Every field is optional on the wire. A missing `pageSize` takes the
/// configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRequest {
    pub page_index: i64,
    pub page_size: Option<i64>,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
    pub filter_column: Option<String>,
    pub filter_query: Option<String>,
}

impl ListRequest {
    /// Set page index and size
    #[must_use]
    pub fn with_page(mut self, page_index: i64, page_size: i64) -> Self {
        self.page_index = page_index;
        self.page_size = Some(page_size);
        self
    }

    /// Set sort column and direction token
    #[must_use]
    pub fn with_sort(mut self, column: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = Some(order.into());
        self
    }

    /// Set filter column and query
    #[must_use]
    pub fn with_filter(mut self, column: impl Into<String>, query: impl Into<String>) -> Self {
        self.filter_column = Some(column.into());
        self.filter_query = Some(query.into());
        self
    }
}

/// Raw duplicate-check parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DupeFieldRequest {
    /// Key of the record being edited; it never counts as its own duplicate
    #[serde(default)]
    pub id: Option<i64>,
    pub field_name: String,
    pub field_value: String,
}

/// One page of records with its paging metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    data: Vec<T>,
    page_index: u64,
    page_size: u64,
    total_count: u64,
    total_pages: u64,
    has_previous_page: bool,
    has_next_page: bool,
}

impl<T> PagedResult<T> {
    pub(crate) fn new(data: Vec<T>, meta: PageMeta) -> Self {
        Self {
            data,
            page_index: meta.page_index,
            page_size: meta.page_size,
            total_count: meta.total_count,
            total_pages: meta.total_pages,
            has_previous_page: meta.has_previous_page,
            has_next_page: meta.has_next_page,
        }
    }

    /// Records on this page
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Take the records, dropping the metadata
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Records matching the filter, across all pages
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Paging metadata of this page
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page_index: self.page_index,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }

    /// Project each record, keeping the metadata
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        let meta = self.meta();
        PagedResult::new(self.data.into_iter().map(f).collect(), meta)
    }
}

/// Runs list and duplicate-check requests against a record source
///
/// Holds no per-request state; one `Pager` can serve any number of concurrent
/// requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager {
    config: PagingConfig,
}

impl Pager {
    /// Pager with the given paging settings
    pub fn new(config: PagingConfig) -> Self {
        Self { config }
    }

    /// Paging settings in use
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Validate a list request into a plan, without touching any source
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColumn`](crate::Error::InvalidColumn) for an unknown
    /// filter or sort column, [`Error::InvalidPaging`](crate::Error::InvalidPaging)
    /// for an out-of-range page index or size.
    pub fn plan<T: Record>(&self, request: &ListRequest) -> Result<QueryPlan<'static, T>> {
        self.prepare(request, None).map(|(plan, _)| plan)
    }

    fn prepare<T: Record>(
        &self,
        request: &ListRequest,
        scope: Option<(&str, FieldValue)>,
    ) -> Result<(QueryPlan<'static, T>, Window)> {
        let registry = T::registry();
        let page_size = request.page_size.unwrap_or(self.config.default_page_size);

        let scope = scope
            .map(|(column, value)| registry.validate(column).map(|c| Scope::new(c, value)))
            .transpose()?;
        let filter = build_filter(
            registry,
            request.filter_column.as_deref(),
            request.filter_query.as_deref(),
        )?;
        let sort = build_sort(
            registry,
            request.sort_column.as_deref(),
            request.sort_order.as_deref(),
        )?;
        let window = Window::bounded(request.page_index, page_size, self.config.max_page_size)?;

        let plan = QueryPlan::new(registry)
            .with_scope(scope)
            .with_filter(filter)
            .with_sort(sort)
            .with_window(window);
        Ok((plan, window))
    }

    /// Produce one page of `T` from `source`
    ///
    /// # Errors
    ///
    /// Rejections from [`Pager::plan`], raised before the source is called, or
    /// [`Error::SourceUnavailable`](crate::Error::SourceUnavailable) when the
    /// count or fetch fails.
    #[tracing::instrument(
        skip_all,
        fields(
            record = T::registry().record_name(),
            page_index = request.page_index,
            page_size = request.page_size,
        )
    )]
    pub async fn page<T, S>(&self, source: &S, request: &ListRequest) -> Result<PagedResult<T>>
    where
        T: Record,
        S: RecordSource<T>,
    {
        // Every input is checked before the source is touched
        let (plan, window) = self.prepare::<T>(request, None)?;
        assemble(source, &plan, window).await
    }

    /// Produce one page of the `T` records whose `scope_column` equals
    /// `scope_value`, such as the books of one author
    ///
    /// The scope holds before the request's own filter, so `totalCount` counts
    /// records that pass both.
    ///
    /// # Errors
    ///
    /// As [`Pager::page`], plus [`Error::InvalidColumn`](crate::Error::InvalidColumn)
    /// when `scope_column` is unknown.
    #[tracing::instrument(
        skip_all,
        fields(
            record = T::registry().record_name(),
            scope = scope_column,
            page_index = request.page_index,
            page_size = request.page_size,
        )
    )]
    pub async fn page_scoped<T, S>(
        &self,
        source: &S,
        request: &ListRequest,
        scope_column: &str,
        scope_value: impl Into<FieldValue>,
    ) -> Result<PagedResult<T>>
    where
        T: Record,
        S: RecordSource<T>,
    {
        let scope = Some((scope_column, scope_value.into()));
        let (plan, window) = self.prepare::<T>(request, scope)?;
        assemble(source, &plan, window).await
    }

    /// Whether another record already holds `field_value` in `field_name`
    ///
    /// The record whose key equals `key` is ignored, so an edited record does
    /// not collide with itself. Only whitelisted fields can be checked.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColumn`](crate::Error::InvalidColumn) when `field_name`
    /// is not on the record's duplicate-check whitelist, raised before the
    /// source is called; [`Error::SourceUnavailable`](crate::Error::SourceUnavailable)
    /// when the probe fails.
    #[tracing::instrument(skip_all, fields(record = T::registry().record_name(), field = field_name))]
    pub async fn is_dupe_field<T, S>(
        &self,
        source: &S,
        key: Option<FieldValue>,
        field_name: &str,
        field_value: &str,
    ) -> Result<bool>
    where
        T: Record,
        S: RecordSource<T>,
    {
        let registry = T::registry();
        let column = registry.validate_dupe_field(field_name)?;
        let probe = DupeProbe::new(registry, column, field_value, key);
        source.exists(&probe).await.map_err(source_failed)
    }

    /// Whether another record has the same identity fields as `record`
    ///
    /// Identity fields are compared together and a null only equals a null.
    /// `record` is excluded by its own key. Record types that declare no
    /// identity fields never report a duplicate, and the source is not called.
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`](crate::Error::SourceUnavailable) when the
    /// probe fails.
    #[tracing::instrument(skip_all, fields(record = T::registry().record_name()))]
    pub async fn is_dupe_record<T, S>(&self, source: &S, record: &T) -> Result<bool>
    where
        T: Record,
        S: RecordSource<T>,
    {
        let probe = DupeProbe::for_record(T::registry(), record);
        if probe.conditions().is_empty() {
            tracing::debug!("Record type has no identity fields");
            return Ok(false);
        }
        source.exists(&probe).await.map_err(source_failed)
    }
}

async fn assemble<T, S>(
    source: &S,
    plan: &QueryPlan<'_, T>,
    window: Window,
) -> Result<PagedResult<T>>
where
    S: RecordSource<T>,
{
    let total_count = source.count(plan).await.map_err(source_failed)?;
    let data = source.fetch(plan).await.map_err(source_failed)?;

    tracing::debug!(total_count, returned = data.len(), "Page assembled");
    Ok(PagedResult::new(data, PageMeta::compute(&window, total_count)))
}

/// Produce one page using the default paging settings
///
/// # Errors
///
/// See [`Pager::page`].
pub async fn create_result<T, S>(source: &S, request: &ListRequest) -> Result<PagedResult<T>>
where
    T: Record,
    S: RecordSource<T>,
{
    Pager::default().page(source, request).await
}

/// Run a duplicate check from its raw request
///
/// # Errors
///
/// See [`Pager::is_dupe_field`].
pub async fn is_dupe_field<T, S>(source: &S, request: &DupeFieldRequest) -> Result<bool>
where
    T: Record,
    S: RecordSource<T>,
{
    Pager::default()
        .is_dupe_field(
            source,
            request.id.map(FieldValue::from),
            &request.field_name,
            &request.field_value,
        )
        .await
}

/// Run a whole-record duplicate check with the default paging settings
///
/// # Errors
///
/// See [`Pager::is_dupe_record`].
pub async fn is_dupe_record<T, S>(source: &S, record: &T) -> Result<bool>
where
    T: Record,
    S: RecordSource<T>,
{
    Pager::default().is_dupe_record(source, record).await
}

fn source_failed(error: SourceError) -> crate::Error {
    tracing::error!(
        operation = %error.operation,
        kind = %error.kind,
        retriable = error.is_retriable(),
        "Record source failed: {}", error.message
    );
    error.into()
}
