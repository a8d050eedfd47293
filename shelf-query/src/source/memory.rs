//! In-process record source

use super::{RecordSource, SourceResult};
use crate::query::{DupeProbe, QueryPlan};

/// Records held in memory, in their original order
///
/// The original order is the tiebreak for equal sort keys.
///
/// # Example
///
/// ```rust
/// use shelf_query::catalog::Category;
/// use shelf_query::source::InMemorySource;
///
/// let source = InMemorySource::new(vec![Category {
///     id: 1,
///     label: "Fantasy".to_string(),
///     total_books: Some(12),
/// }]);
/// assert_eq!(source.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct InMemorySource<T> {
    records: Vec<T>,
}

impl<T> InMemorySource<T> {
    /// Wrap a set of records
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are held
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in original order
    pub fn records(&self) -> &[T] {
        &self.records
    }
}

// A derive would require `T: Default`
impl<T> Default for InMemorySource<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for InMemorySource<T> {
    fn from(records: Vec<T>) -> Self {
        Self::new(records)
    }
}

impl<T: Clone + Send + Sync> RecordSource<T> for InMemorySource<T> {
    async fn count(&self, plan: &QueryPlan<'_, T>) -> SourceResult<u64> {
        Ok(self.records.iter().filter(|r| plan.admits(r)).count() as u64)
    }

    async fn fetch(&self, plan: &QueryPlan<'_, T>) -> SourceResult<Vec<T>> {
        let mut matched: Vec<&T> = self.records.iter().filter(|r| plan.admits(r)).collect();

        // sort_by is stable
        let sort = plan.sort();
        matched.sort_by(|a, b| sort.compare(a, b));

        let page = match plan.window() {
            Some(window) => matched
                .into_iter()
                .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit()).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matched.into_iter().cloned().collect(),
        };
        Ok(page)
    }

    async fn exists(&self, probe: &DupeProbe<'_, T>) -> SourceResult<bool> {
        Ok(self.records.iter().any(|r| probe.matches(r)))
    }
}
