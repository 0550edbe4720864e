//! Result bundle of one canned query execution

use super::errors::{QueryError, QueryResult};
use crate::permission::CountBounds;

/// Immutable output of a canned query execution.
///
/// Accessors that expect a particular shape (one page, one result, a
/// requested total) fail instead of guessing.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults<R> {
    query_execution_id: String,
    pages: Vec<Vec<R>>,
    has_more_items: bool,
    total_result_count: Option<CountBounds>,
    permissions_applied: bool,
}

impl<R> QueryResults<R> {
    pub(crate) fn new(
        query_execution_id: String,
        pages: Vec<Vec<R>>,
        has_more_items: bool,
        total_result_count: Option<CountBounds>,
        permissions_applied: bool,
    ) -> Self {
        Self {
            query_execution_id,
            pages,
            has_more_items,
            total_result_count,
            permissions_applied,
        }
    }

    /// Id of the execution that produced these results
    pub fn query_execution_id(&self) -> &str {
        &self.query_execution_id
    }

    /// All pages, in order
    pub fn pages(&self) -> &[Vec<R>] {
        &self.pages
    }

    /// The only page; fails unless there is exactly one
    pub fn page(&self) -> QueryResult<&[R]> {
        match self.pages.as_slice() {
            [page] => Ok(page),
            pages => Err(QueryError::CardinalityMismatch {
                expected: "exactly one page of results",
                actual: format!("{} pages", pages.len()),
            }),
        }
    }

    /// The only result; fails unless there is one page holding one item
    pub fn single_result(&self) -> QueryResult<&R> {
        match self.pages.as_slice() {
            [page] => match page.as_slice() {
                [item] => Ok(item),
                items => Err(QueryError::CardinalityMismatch {
                    expected: "exactly one page of one result",
                    actual: format!("1 page of {} results", items.len()),
                }),
            },
            pages => Err(QueryError::CardinalityMismatch {
                expected: "exactly one page of one result",
                actual: format!("{} pages", pages.len()),
            }),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of results across all pages
    pub fn paged_result_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    /// True if results exist beyond the requested pages
    pub fn has_more_items(&self) -> bool {
        self.has_more_items
    }

    /// Total result count bounds; fails if the parameters did not ask for it
    pub fn total_result_count(&self) -> QueryResult<CountBounds> {
        self.total_result_count
            .ok_or(QueryError::TotalCountNotRequested)
    }

    /// True if the results were trimmed to what the caller may see
    pub fn permissions_applied(&self) -> bool {
        self.permissions_applied
    }

    /// Consumes the bundle, returning its pages
    pub fn into_pages(self) -> Vec<Vec<R>> {
        self.pages
    }
}
