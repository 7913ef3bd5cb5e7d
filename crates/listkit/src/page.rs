//! Result pages and pagination arithmetic.

use serde::Serialize;

use crate::traits::Keyed;

/// One page of query results plus pagination metadata.
///
/// `page` and `page_size` echo the request; the engine does not clamp an
/// out-of-range page, it returns no items for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage<'a, T> {
    /// Records on this page, in display order.
    pub items: Vec<&'a T>,
    /// Requested page (1-based).
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Records matching search and filters, across all pages.
    pub total_items: usize,
    /// `ceil(total_items / page_size)`, 0 when there is nothing to show.
    pub total_pages: usize,
}

impl<'a, T> ResultPage<'a, T> {
    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if a previous page exists within range.
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// Returns `true` if a following page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based inclusive bounds of the visible items within the full result,
    /// for "Showing 11-20 of 57". `None` when the page is empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }

    /// Keys of the visible records, in display order.
    pub fn keys(&self) -> Vec<T::Key>
    where
        T: Keyed,
    {
        self.items.iter().map(|item| item.key()).collect()
    }

    /// Clones the visible records into an owned page.
    pub fn to_owned_items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().map(|item| (*item).clone()).collect()
    }
}

/// `ceil(total_items / page_size)`; 0 for an empty result or a zero page size.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Clamps a requested page into `[1, max(total_pages, 1)]`.
///
/// The engine reports what was asked; list views call this when the
/// result shrinks under the current page (after typing in the search box,
/// say).
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Index window `[start, end)` of a page within `total_items`, or `None`
/// when the page is out of range or the size is zero.
pub(crate) fn page_window(page: usize, page_size: usize, total_items: usize) -> Option<(usize, usize)> {
    if page == 0 || page_size == 0 {
        return None;
    }
    let start = (page - 1).checked_mul(page_size)?;
    if start >= total_items {
        return None;
    }
    let end = start.saturating_add(page_size).min(total_items);
    Some((start, end))
}
