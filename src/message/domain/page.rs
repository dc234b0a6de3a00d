//! Offset pagination with stable ordering.

use crate::config::MessagingConfig;
use serde::{Deserialize, Serialize};

/// Page selection supplied by the caller.
///
/// Pages are 1-based. A missing page size falls back to the configured
/// default and every size is clamped to the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    page: usize,
    page_size: Option<usize>,
}

impl PageRequest {
    /// Requests the first page with the default size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }

    /// Requests `page` with an explicit size.
    #[must_use]
    pub const fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: Some(page_size),
        }
    }

    /// Returns the 1-based page number, treating `0` as the first page.
    #[must_use]
    pub const fn page(self) -> usize {
        if self.page == 0 { 1 } else { self.page }
    }

    /// Returns the effective page size under `config`.
    #[must_use]
    pub fn page_size(self, config: &MessagingConfig) -> usize {
        self.page_size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1))
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
    total_items: usize,
}

impl<T> Page<T> {
    /// Slices an already ordered collection.
    #[must_use]
    pub fn paginate(ordered: Vec<T>, request: PageRequest, config: &MessagingConfig) -> Self {
        let page = request.page();
        let page_size = request.page_size(config);
        let total_items = ordered.len();
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let items = ordered.into_iter().skip(offset).take(page_size).collect();
        Self {
            items,
            page,
            page_size,
            total_items,
        }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the effective page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the size of the whole result set.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Returns the number of pages in the whole result set.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Returns `true` when a later page holds more items.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}
