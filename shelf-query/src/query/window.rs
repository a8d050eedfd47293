//! Paginator
//!
//! A [`Window`] is a checked page index and size. [`PageMeta`] derives the
//! page counts and navigation flags from a window and the filtered total.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated page window
///
/// # Example
///
/// ```rust
/// use shelf_query::query::Window;
///
/// let window = Window::new(2, 10).unwrap();
/// assert_eq!(window.offset(), 20);
/// assert_eq!(window.limit(), 10);
///
/// assert!(Window::new(-1, 10).is_err());
/// assert!(Window::new(0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    page_index: u64,
    page_size: u64,
    offset: u64,
}

impl Window {
    /// Check a caller-supplied page index and size
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPaging`] when `page_index < 0`, `page_size < 1`, or the
    /// resulting offset does not fit in an `i64`.
    pub fn new(page_index: i64, page_size: i64) -> Result<Self> {
        let reject = |reason: &'static str| {
            tracing::debug!(page_index, page_size, reason, "Rejected paging");
            Error::InvalidPaging {
                page_index,
                page_size,
                reason,
            }
        };

        if page_index < 0 {
            return Err(reject("pageIndex must be >= 0"));
        }
        if page_size < 1 {
            return Err(reject("pageSize must be >= 1"));
        }
        let offset = page_index
            .checked_mul(page_size)
            .ok_or_else(|| reject("pageIndex * pageSize overflows"))?;

        Ok(Self {
            page_index: page_index as u64,
            page_size: page_size as u64,
            offset: offset as u64,
        })
    }

    /// Check a page index and size against an optional size cap
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPaging`] for the same reasons as [`Window::new`], or when
    /// `page_size` exceeds `max_page_size`.
    pub fn bounded(page_index: i64, page_size: i64, max_page_size: Option<i64>) -> Result<Self> {
        let window = Self::new(page_index, page_size)?;
        match max_page_size {
            Some(max) if page_size > max => {
                tracing::debug!(page_index, page_size, max, "Rejected page size above cap");
                Err(Error::InvalidPaging {
                    page_index,
                    page_size,
                    reason: "pageSize exceeds the configured maximum",
                })
            }
            _ => Ok(window),
        }
    }

    /// Zero-based page index
    #[must_use]
    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    /// Records per page
    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Records to skip
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Records to take
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Expected page length for a filtered total
    #[must_use]
    pub fn expected_len(&self, total_count: u64) -> u64 {
        total_count.saturating_sub(self.offset).min(self.page_size)
    }
}

/// Pagination metadata for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page_index: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageMeta {
    /// Compute metadata from a window and the filtered, pre-window count
    #[must_use]
    pub fn compute(window: &Window, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(window.page_size);
        Self {
            page_index: window.page_index,
            page_size: window.page_size,
            total_count,
            total_pages,
            has_previous_page: window.page_index > 0,
            has_next_page: window.page_index + 1 < total_pages,
        }
    }
}
