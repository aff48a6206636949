//! Page arithmetic: page count, link window, row range and page moves.

use std::ops::RangeInclusive;

/// Pagination state. `current_page` is 1-based and always within
/// `1..=page_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    per_page: usize,
    total_rows: usize,
    page_padding: usize,
}

impl Pagination {
    /// `per_page` is floored at 1.
    pub fn new(current_page: usize, per_page: usize, total_rows: usize, page_padding: usize) -> Self {
        let mut pagination = Self {
            current_page,
            per_page: per_page.max(1),
            total_rows,
            page_padding,
        };
        pagination.clamp();
        pagination
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn page_padding(&self) -> usize {
        self.page_padding
    }

    /// `ceil(total_rows / per_page)`, never less than 1.
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.per_page).max(1)
    }

    /// Row offset of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.per_page
    }

    /// Controls are suppressed when everything fits on one page.
    pub fn is_paginated(&self) -> bool {
        self.per_page < self.total_rows
    }

    /// Page numbers to render as links.
    ///
    /// The window is `2 * page_padding` wide around the current page and
    /// slides instead of shrinking when it hits either end.
    pub fn window(&self) -> RangeInclusive<usize> {
        let page_count = self.page_count();
        let width = self.page_padding * 2;

        if width >= page_count {
            return 1..=page_count;
        }

        let mut start = self.current_page.saturating_sub(self.page_padding).max(1);
        let mut end = start + width;
        if end > page_count {
            end = page_count;
            start = end - width;
        }
        start..=end
    }

    /// First and last row numbers shown on the current page.
    pub fn row_range(&self) -> (usize, usize) {
        let start = (self.offset() + 1).max(1);
        let end = (self.current_page * self.per_page).min(self.total_rows);
        (start, end)
    }

    /// "Showing X to Y of Z rows".
    pub fn summary(&self) -> String {
        let (start, end) = self.row_range();
        format!("Showing {} to {} of {} rows", start, end, self.total_rows)
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.page_count()
    }

    /// Moves to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page;
        self.clamp();
    }

    pub fn first(&mut self) {
        self.go_to(1);
    }

    pub fn previous(&mut self) {
        self.go_to(self.current_page.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page + 1);
    }

    pub fn last(&mut self) {
        self.go_to(self.page_count());
    }

    /// Changes page size and keeps the current page in range.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.clamp();
    }

    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.current_page = self.current_page.clamp(1, self.page_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_95_rows() {
        let p = Pagination::new(1, 10, 95, 2);
        assert_eq!(p.page_count(), 10);
        assert_eq!(p.summary(), "Showing 1 to 10 of 95 rows");
        assert!(p.is_first());
        assert!(!p.is_last());
        assert!(p.is_paginated());
    }

    #[test]
    fn test_fits_on_one_page() {
        let p = Pagination::new(1, 10, 7, 2);
        assert!(!p.is_paginated());
        assert_eq!(p.page_count(), 1);
        let p = Pagination::new(1, 10, 10, 2);
        assert!(!p.is_paginated());
    }

    #[test]
    fn test_zero_rows_is_one_page() {
        let p = Pagination::new(5, 10, 0, 2);
        assert_eq!(p.page_count(), 1);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_window_shows_all_when_small() {
        let p = Pagination::new(2, 10, 40, 2);
        assert_eq!(p.window(), 1..=4);
    }

    #[test]
    fn test_window_centers_on_current() {
        let p = Pagination::new(5, 10, 95, 2);
        assert_eq!(p.window(), 3..=7);
    }

    #[test]
    fn test_window_clamps_at_start() {
        let p = Pagination::new(1, 10, 95, 2);
        assert_eq!(p.window(), 1..=5);
    }

    #[test]
    fn test_window_slides_at_end() {
        let p = Pagination::new(10, 10, 95, 2);
        assert_eq!(p.window(), 6..=10);
    }

    #[test]
    fn test_last_page_range() {
        let p = Pagination::new(10, 10, 95, 2);
        assert_eq!(p.row_range(), (91, 95));
        assert!(p.is_last());
    }

    #[test]
    fn test_moves_clamp() {
        let mut p = Pagination::new(1, 10, 95, 2);
        p.previous();
        assert_eq!(p.current_page(), 1);
        p.last();
        p.next();
        assert_eq!(p.current_page(), 10);
        p.go_to(0);
        assert_eq!(p.current_page(), 1);
        p.go_to(42);
        assert_eq!(p.current_page(), 10);
    }

    #[test]
    fn test_per_page_change_clamps_page() {
        let mut p = Pagination::new(10, 10, 95, 2);
        p.set_per_page(50);
        assert_eq!(p.current_page(), 2);
        p.set_per_page(0);
        assert_eq!(p.per_page(), 1);
    }
}
