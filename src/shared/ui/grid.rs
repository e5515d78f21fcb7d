use serde::Serialize;

use crate::shared::constants::PAGINATOR_SIZE;

/// Client-side style paginated grid: holds the full result set and exposes
/// one page of it.
#[derive(Debug, Clone)]
pub struct PaginatedGrid<T> {
    items: Vec<T>,
    page_size: usize,
    paginator_size: usize,
    page: usize,
}

/// Page links around the current page, for the paginator bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub links: Vec<usize>,
}

impl<T> PaginatedGrid<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1),
            paginator_size: PAGINATOR_SIZE,
            page: 1,
        }
    }

    /// Replace the rows. The current page is kept when still in range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Jump to `page`, clamped to the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size).max(1)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible_items(&self) -> &[T] {
        let start = ((self.page - 1) * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn paginator(&self) -> Paginator {
        let total = self.total_pages();
        let window = self.paginator_size.min(total);
        let first = self
            .page
            .saturating_sub(window / 2)
            .clamp(1, total - window + 1);

        Paginator {
            page: self.page,
            total_pages: total,
            total_items: self.items.len(),
            links: (first..first + window).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> PaginatedGrid<usize> {
        let mut grid = PaginatedGrid::new(5);
        grid.set_items((1..=n).collect());
        grid
    }

    #[test]
    fn test_empty_grid_has_one_page() {
        let grid = grid(0);
        assert_eq!(grid.total_pages(), 1);
        assert!(grid.visible_items().is_empty());
        assert_eq!(grid.paginator().links, vec![1]);
    }

    #[test]
    fn test_last_page_is_partial() {
        let mut grid = grid(12);
        grid.go_to_page(3);
        assert_eq!(grid.visible_items(), &[11, 12]);
        grid.go_to_page(99);
        assert_eq!(grid.page(), 3);
        grid.go_to_page(0);
        assert_eq!(grid.page(), 1);
    }

    #[test]
    fn test_shrinking_result_clamps_page() {
        let mut grid = grid(30);
        grid.go_to_page(6);
        grid.set_items((1..=7).collect());
        assert_eq!(grid.page(), 2);
        assert_eq!(grid.visible_items(), &[6, 7]);
    }

    #[test]
    fn test_paginator_window_follows_page() {
        let mut grid = grid(50);
        assert_eq!(grid.paginator().links, vec![1, 2, 3, 4, 5]);
        grid.go_to_page(6);
        assert_eq!(grid.paginator().links, vec![4, 5, 6, 7, 8]);
        grid.go_to_page(10);
        assert_eq!(grid.paginator().links, vec![6, 7, 8, 9, 10]);
    }
}
