//! Permission filter contract
//!
//! The pipeline hands the filter its candidates, the caller's token and the
//! number of permitted items it needs. The filter trims to at most that
//! many and reports how many permitted items exist overall, exactly or as a
//! range.

use serde::{Deserialize, Serialize};

use crate::paging::ResultBound;
use crate::query::QueryResult;

/// Total result count as (lower, upper) bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBounds {
    pub lower: usize,
    pub upper: usize,
}

impl CountBounds {
    pub fn new(lower: usize, upper: usize) -> Self {
        debug_assert!(lower <= upper);
        Self { lower, upper }
    }

    /// Both bounds equal to `count`
    pub fn exact(count: usize) -> Self {
        Self::new(count, count)
    }

    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}

/// Output of a permission filter
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionedPage<R> {
    /// Permitted items in input order, at most the requested count
    pub page: Vec<R>,
    /// Exact when the input was fully scanned
    pub total: CountBounds,
    /// Whether filtering actually ran
    pub permissions_applied: bool,
    /// Number of items the filter evaluated
    pub evaluated: usize,
}

/// Trims a candidate sequence to the items the caller may see.
///
/// Implementations evaluate in input order and stop once `requested`
/// permitted items are found or the input runs out.
pub trait PermissionFilter<R>: Send + Sync {
    fn apply(
        &self,
        results: Vec<R>,
        authentication_token: &str,
        requested: ResultBound,
    ) -> QueryResult<PermissionedPage<R>>;
}

impl<R, F> PermissionFilter<R> for F
where
    F: Fn(Vec<R>, &str, ResultBound) -> QueryResult<PermissionedPage<R>> + Send + Sync,
{
    fn apply(
        &self,
        results: Vec<R>,
        authentication_token: &str,
        requested: ResultBound,
    ) -> QueryResult<PermissionedPage<R>> {
        self(results, authentication_token, requested)
    }
}
