//! Pagination utilities

use serde::Serialize;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page cut out of a filtered, sorted slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    /// Rows of the page (never longer than the page size)
    pub slice: &'a [T],

    /// Requested page after clamping into `1..=total_pages`
    pub clamped_page: usize,

    /// Total number of pages, at least 1
    pub total_pages: usize,

    /// Total number of items across all pages
    pub total_items: usize,
}

/// Number of pages needed for `total` items, never less than 1
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Cut page `page` (1-based) of `page_size` items out of `items`
///
/// Out-of-range pages are clamped and a zero page size is treated as 1, so
/// this never panics, including on empty input.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let clamped_page = page.clamp(1, total_pages);

    let start = ((clamped_page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        slice: &items[start..end],
        clamped_page,
        total_pages,
        total_items,
    }
}

/// Current page bookkeeping for one list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Number of items per page
    pub items_per_page: usize,

    /// Total number of items (after search and filters)
    pub total_items: usize,
}

impl PageState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.items_per_page)
    }

    /// Jump to `page`, clamped into the valid range
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Change the page size; always goes back to page 1
    pub fn set_page_size(&mut self, size: usize) {
        self.items_per_page = size.max(1);
        self.current_page = 1;
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Record a new item total and pull the current page back into range
    pub fn set_total(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.current_page, self.items_per_page, self.total_items)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata, clamping `page` into range
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = total_pages(total, limit);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_first_page() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 1, 10);
        assert_eq!(page.slice, &items[0..10]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 23);
    }

    #[test]
    fn test_paginate_last_page_is_partial() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 3, 10);
        assert_eq!(page.slice, &[21, 22, 23]);
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 5, 10);
        assert_eq!(page.clamped_page, 3);
        assert_eq!(page.slice.len(), 3);

        let page = paginate(&items, 0, 10);
        assert_eq!(page.clamped_page, 1);
        assert_eq!(page.slice[0], 1);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 4, 10);
        assert!(page.slice.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.clamped_page, 1);
        assert_eq!(page.total_items, 0);
    }

    #[test]
    fn test_paginate_zero_page_size() {
        let items = vec!['a', 'b'];
        let page = paginate(&items, 2, 0);
        assert_eq!(page.slice, &['b']);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_page_state_clamps_on_new_total() {
        let mut state = PageState::new(10);
        state.set_total(100);
        state.set_page(8);
        assert_eq!(state.current_page, 8);

        state.set_total(25);
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn test_page_state_size_change_resets_page() {
        let mut state = PageState::new(10);
        state.set_total(100);
        state.set_page(4);
        state.set_page_size(25);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages(), 4);

        state.set_page_size(0);
        assert_eq!(state.items_per_page, 1);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let last = PaginationMeta::new(8, 20, 145);
        assert!(last.has_prev);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(3, 20, 0);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }
}
