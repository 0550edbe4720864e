//! Page window and the post-query paging algorithm
//!
//! A window is fixed at construction: results to skip, page size, number of
//! consecutive pages, and the 1-based page number to start from.

use serde::{Deserialize, Serialize};

use super::bound::ResultBound;
use crate::query::{QueryError, QueryResult};

/// Default number of results to skip
pub const DEFAULT_SKIP_RESULTS: usize = 0;

/// Default page number (1-based)
pub const DEFAULT_PAGE_NUMBER: usize = 1;

/// Default number of pages to materialize
pub const DEFAULT_PAGE_COUNT: usize = 1;

/// Skip/size/number/count parameters describing which pages to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowFields")]
pub struct PageWindow {
    skip: usize,
    page_size: ResultBound,
    page_number: usize,
    page_count: usize,
}

/// Unvalidated wire form; deserialization goes through `PageWindow::new`
#[derive(Deserialize)]
struct WindowFields {
    skip: usize,
    page_size: ResultBound,
    page_number: usize,
    page_count: usize,
}

impl TryFrom<WindowFields> for PageWindow {
    type Error = QueryError;

    fn try_from(fields: WindowFields) -> QueryResult<Self> {
        Self::new(
            fields.skip,
            fields.page_size,
            fields.page_number,
            fields.page_count,
        )
    }
}

impl PageWindow {
    /// Creates a validated window.
    ///
    /// `page_size` must be non-zero, `page_number` and `page_count` at least 1.
    pub fn new(
        skip: usize,
        page_size: ResultBound,
        page_number: usize,
        page_count: usize,
    ) -> QueryResult<Self> {
        if page_size == ResultBound::Finite(0) {
            return Err(QueryError::invalid_page_window("page size must be > 0"));
        }
        if page_number == 0 {
            return Err(QueryError::invalid_page_window("page number must be >= 1"));
        }
        if page_count == 0 {
            return Err(QueryError::invalid_page_window("page count must be >= 1"));
        }

        Ok(Self {
            skip,
            page_size,
            page_number,
            page_count,
        })
    }

    /// One unbounded page, nothing skipped
    pub fn unbounded() -> Self {
        Self {
            skip: DEFAULT_SKIP_RESULTS,
            page_size: ResultBound::Unbounded,
            page_number: DEFAULT_PAGE_NUMBER,
            page_count: DEFAULT_PAGE_COUNT,
        }
    }

    /// A single page of `page_size` results after skipping `skip`
    pub fn single_page(skip: usize, page_size: usize) -> QueryResult<Self> {
        Self::new(
            skip,
            ResultBound::Finite(page_size),
            DEFAULT_PAGE_NUMBER,
            DEFAULT_PAGE_COUNT,
        )
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn page_size(&self) -> ResultBound {
        self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// `skip + page_size * page_count`, saturating to unbounded
    pub fn results_required_for_paging(&self) -> ResultBound {
        ResultBound::Finite(self.skip).saturating_add(self.page_size.saturating_mul(self.page_count))
    }

    /// Index of the first result of the window
    fn first_result(&self) -> ResultBound {
        ResultBound::Finite(self.skip)
            .saturating_add(self.page_size.saturating_mul(self.page_number - 1))
    }

    /// Slices `results` into the pages this window selects.
    ///
    /// Never reads past the end of `results`. The last page may be short.
    pub fn apply<R>(&self, results: Vec<R>) -> Vec<Vec<R>> {
        let available = results.len();

        // Asking for more in one page than exists
        if self.skip == 0 && self.page_size.exceeds(available) {
            return vec![results];
        }

        // Window starts after every result
        let first = match self.first_result() {
            ResultBound::Finite(first) if first <= available => first,
            _ => return Vec::new(),
        };

        let wanted = self
            .page_size
            .saturating_mul(self.page_count)
            .finite()
            .unwrap_or(usize::MAX);
        let remaining = available - first;
        let page_capacity = self.page_size.finite().map_or(remaining, |size| size.min(remaining));

        let mut pages = Vec::with_capacity(self.page_count.min(remaining.max(1)));
        let mut page = Vec::with_capacity(page_capacity);

        for item in results.into_iter().skip(first).take(wanted) {
            if self.page_size.is_satisfied_by(page.len()) {
                pages.push(std::mem::replace(&mut page, Vec::with_capacity(page_capacity)));
            }
            page.push(item);
        }
        pages.push(page);

        pages
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(skip: usize, size: usize, number: usize, count: usize) -> PageWindow {
        PageWindow::new(skip, ResultBound::Finite(size), number, count).unwrap()
    }

    fn sizes(pages: &[Vec<usize>]) -> Vec<usize> {
        pages.iter().map(Vec::len).collect()
    }

    #[test]
    fn test_results_required_for_paging() {
        assert_eq!(
            window(5, 10, 1, 3).results_required_for_paging(),
            ResultBound::Finite(35)
        );
        assert_eq!(
            PageWindow::unbounded().results_required_for_paging(),
            ResultBound::Unbounded
        );
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = PageWindow::new(0, ResultBound::Finite(0), 1, 1).unwrap_err();
        assert_eq!(err.code(), "CQ_INVALID_PAGE_WINDOW");
    }

    #[test]
    fn test_rejects_zero_page_number_and_count() {
        assert!(PageWindow::new(0, ResultBound::Finite(5), 0, 1).is_err());
        assert!(PageWindow::new(0, ResultBound::Finite(5), 1, 0).is_err());
    }

    #[test]
    fn test_shortcut_whole_sequence_in_one_page() {
        let pages = window(0, 10, 1, 1).apply((0..5).collect::<Vec<_>>());
        assert_eq!(pages, vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn test_start_after_all_results() {
        let pages = window(8, 5, 1, 1).apply((0..5).collect::<Vec<usize>>());
        assert!(pages.is_empty());
    }

    #[test]
    fn test_chunking_with_short_last_page() {
        let pages = window(0, 10, 1, 3).apply((0..23).collect::<Vec<usize>>());
        assert_eq!(sizes(&pages), vec![10, 10, 3]);
        assert_eq!(pages[2], vec![20, 21, 22]);
    }

    #[test]
    fn test_page_number_offsets_window() {
        let pages = window(0, 5, 2, 1).apply((0..12).collect::<Vec<usize>>());
        assert_eq!(pages, vec![vec![5, 6, 7, 8, 9]]);
    }

    #[test]
    fn test_skip_and_page_number_combine() {
        let pages = window(2, 3, 2, 2).apply((0..20).collect::<Vec<usize>>());
        assert_eq!(pages, vec![vec![5, 6, 7], vec![8, 9, 10]]);
    }

    #[test]
    fn test_stops_at_total_wanted() {
        let pages = window(0, 2, 1, 2).apply((0..10).collect::<Vec<usize>>());
        assert_eq!(sizes(&pages), vec![2, 2]);
    }

    #[test]
    fn test_window_starting_exactly_at_end_yields_empty_page() {
        let pages = window(5, 2, 1, 1).apply((0..5).collect::<Vec<usize>>());
        assert_eq!(pages, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_unbounded_page_size_with_skip() {
        let window = PageWindow::new(3, ResultBound::Unbounded, 1, 1).unwrap();
        let pages = window.apply((0..6).collect::<Vec<usize>>());
        assert_eq!(pages, vec![vec![3, 4, 5]]);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"skip":2,"page_size":{"finite":5},"page_number":3,"page_count":2}"#;
        let window: PageWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window, PageWindow::new(2, ResultBound::Finite(5), 3, 2).unwrap());

        let invalid = [
            r#"{"skip":2,"page_size":{"finite":5},"page_number":0,"page_count":1}"#,
            r#"{"skip":2,"page_size":{"finite":5},"page_number":1,"page_count":0}"#,
            r#"{"skip":2,"page_size":{"finite":0},"page_number":1,"page_count":1}"#,
        ];
        for json in invalid {
            let err = serde_json::from_str::<PageWindow>(json).unwrap_err();
            assert!(err.to_string().contains("page"), "{}", json);
        }
    }

    #[test]
    fn test_serialized_window_reloads() {
        let window = PageWindow::new(4, ResultBound::Unbounded, 1, 1).unwrap();
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(serde_json::from_str::<PageWindow>(&json).unwrap(), window);
    }

    #[test]
    fn test_unbounded_page_size_second_page_is_empty() {
        let window = PageWindow::new(2, ResultBound::Unbounded, 2, 1).unwrap();
        let pages = window.apply((0..6).collect::<Vec<usize>>());
        assert!(pages.is_empty());
    }
}
