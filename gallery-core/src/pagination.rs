//! Page window over a working set
//!
//! Pure range arithmetic plus the two navigation commands. Pages are
//! 1-based; an empty list still has one (empty) page.

use std::ops::Range;

/// Current page position and loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub current_page: usize,
    /// Items per page (at least 1)
    pub page_size: usize,
    /// True until the current page's metadata has settled
    pub loading: bool,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            loading: false,
        }
    }

    /// Back to page 1, keeping the page size.
    pub fn reset(&mut self, loading: bool) {
        self.current_page = 1;
        self.loading = loading;
    }

    /// Advance one page unless already on the last page.
    ///
    /// Returns whether the page changed. `loading` is raised only on a move.
    pub fn go_next(&mut self, len: usize) -> bool {
        if !can_go_next(self, len) {
            return false;
        }
        self.current_page += 1;
        self.loading = true;
        true
    }

    /// Step back one page, clamping at page 1.
    ///
    /// Returns whether the page changed. `loading` is raised only on a move.
    pub fn go_prev(&mut self) -> bool {
        if !can_go_prev(self) {
            return false;
        }
        self.current_page -= 1;
        self.loading = true;
        true
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Number of pages for `len` items; never less than 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Index range of the items visible on the current page.
pub fn compute_visible_range(pagination: &Pagination, len: usize) -> Range<usize> {
    let page_size = pagination.page_size.max(1);
    let start = (pagination.current_page.max(1) - 1) * page_size;
    let end = (pagination.current_page.max(1) * page_size).min(len);
    start.min(end)..end
}

pub fn can_go_next(pagination: &Pagination, len: usize) -> bool {
    pagination.current_page < page_count(len, pagination.page_size)
}

pub fn can_go_prev(pagination: &Pagination) -> bool {
    pagination.current_page > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 1), 1);
        assert_eq!(page_count(3, 1), 3);
        assert_eq!(page_count(5, 2), 3);
        assert_eq!(page_count(4, 2), 2);
    }

    #[test]
    fn test_visible_range_single_item_pages() {
        let mut p = Pagination::new(1);
        assert_eq!(compute_visible_range(&p, 3), 0..1);
        p.current_page = 3;
        assert_eq!(compute_visible_range(&p, 3), 2..3);
    }

    #[test]
    fn test_visible_range_clamps_last_page() {
        let p = Pagination {
            current_page: 3,
            page_size: 2,
            loading: false,
        };
        assert_eq!(compute_visible_range(&p, 5), 4..5);
        assert_eq!(compute_visible_range(&Pagination::new(2), 0), 0..0);
    }

    #[test]
    fn test_next_stops_at_last_page_without_loading() {
        let mut p = Pagination::new(1);
        assert!(p.go_next(2));
        assert_eq!(p.current_page, 2);
        assert!(p.loading);

        p.loading = false;
        assert!(!p.go_next(2));
        assert_eq!(p.current_page, 2);
        assert!(!p.loading);
    }

    #[test]
    fn test_prev_clamps_at_first_page() {
        let mut p = Pagination::new(1);
        assert!(!p.go_prev());
        assert_eq!(p.current_page, 1);
        assert!(!p.loading);

        p.current_page = 2;
        assert!(p.go_prev());
        assert_eq!(p.current_page, 1);
        assert!(p.loading);
    }

    #[test]
    fn test_empty_list_disables_navigation() {
        let p = Pagination::new(1);
        assert!(!can_go_next(&p, 0));
        assert!(!can_go_prev(&p));
    }
}
