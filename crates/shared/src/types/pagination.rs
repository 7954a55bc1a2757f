//! Page selection for list endpoints.

use serde::{Deserialize, Serialize};

/// Page size when the client does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// A normalized page selection: `page >= 1` and `1 <= per_page <= MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl PageRequest {
    /// Normalizes raw query parameters.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Page number, 1-indexed.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * self.limit()
    }

    /// Rows to fetch.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Where this page sits.
    pub meta: PageMeta,
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Rows across all pages.
    pub total: u64,
    /// Page count; 1 for an empty result.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Wraps the rows fetched for `request` out of `total`.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let pages = total.div_ceil(request.limit()).max(1);

        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total,
                total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
            },
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
