use serde::{Deserialize, Serialize};
use std::ops::Range;

/// 1-based page request; `page = 0` is treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, per_page: usize) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }

    /// Index range of this page within `total` items (empty past the end).
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.offset().min(total);
        let end = start.saturating_add(self.per_page).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}

/// Number of pages needed for `total` items; zero items still yield one page.
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub page_count: usize,
}

impl<T: Clone> Page<T> {
    pub fn from_slice(items: &[T], req: PageRequest) -> Self {
        Self {
            items: req.slice(items).to_vec(),
            page: req.page,
            per_page: req.per_page,
            total: items.len(),
            page_count: page_count(items.len(), req.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 3), 1);
        assert_eq!(page_count(3, 3), 1);
        assert_eq!(page_count(4, 3), 2);
        assert_eq!(page_count(7, 3), 3);
        // zero page size is clamped
        assert_eq!(page_count(2, 0), 2);
    }

    #[test]
    fn slices_stay_in_bounds() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(PageRequest::new(None, 3).slice(&items), &[0, 1, 2]);
        assert_eq!(PageRequest::new(Some(3), 3).slice(&items), &[6]);
        assert!(PageRequest::new(Some(9), 3).slice(&items).is_empty());
        assert_eq!(PageRequest::new(Some(0), 3).page, 1);
    }

    #[test]
    fn page_reports_totals() {
        let items = vec!["a", "b", "c", "d"];
        let page = Page::from_slice(&items, PageRequest::new(Some(2), 3));
        assert_eq!(page.items, vec!["d"]);
        assert_eq!(page.total, 4);
        assert_eq!(page.page_count, 2);
    }
}
