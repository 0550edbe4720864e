//! Pluggable query stages
//!
//! A canned query is one raw fetch followed by up to three optional
//! post-query phases. Which phases run, and with which implementation, is
//! declared per query variant in a [`PostQueryPhases`] value.

use std::sync::Arc;

use super::errors::{Phase, QueryError, QueryResult};
use super::parameters::QueryParameters;
use super::sort::SortSpec;
use crate::paging::PageWindow;
use crate::permission::PermissionFilter;

/// Candidate sequence produced by a raw fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RawResults<R> {
    items: Vec<R>,
    permissions_applied: bool,
}

impl<R> RawResults<R> {
    /// Results that still need permission checks
    pub fn new(items: Vec<R>) -> Self {
        Self {
            items,
            permissions_applied: false,
        }
    }

    /// Results the fetch already restricted to what the caller may see
    pub fn permissioned(items: Vec<R>) -> Self {
        Self {
            items,
            permissions_applied: true,
        }
    }

    pub fn permissions_applied(&self) -> bool {
        self.permissions_applied
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<R> {
        self.items
    }
}

impl<R> From<Vec<R>> for RawResults<R> {
    fn from(items: Vec<R>) -> Self {
        Self::new(items)
    }
}

/// The domain-specific fetch.
///
/// Returning `Ok(None)` is a broken implementation and fails the execution;
/// an empty sequence is a valid answer.
pub trait RawQuery<P, R>: Send + Sync {
    fn query_and_filter(&self, parameters: &QueryParameters<P>) -> QueryResult<Option<RawResults<R>>>;
}

impl<P, R, F> RawQuery<P, R> for F
where
    F: Fn(&QueryParameters<P>) -> QueryResult<Option<RawResults<R>>> + Send + Sync,
{
    fn query_and_filter(&self, parameters: &QueryParameters<P>) -> QueryResult<Option<RawResults<R>>> {
        self(parameters)
    }
}

/// Reorders fetched results before permissions and paging
pub trait PostQuerySorter<R>: Send + Sync {
    fn sort(&self, results: Vec<R>, spec: &SortSpec) -> QueryResult<Vec<R>>;
}

impl<R, F> PostQuerySorter<R> for F
where
    F: Fn(Vec<R>, &SortSpec) -> QueryResult<Vec<R>> + Send + Sync,
{
    fn sort(&self, results: Vec<R>, spec: &SortSpec) -> QueryResult<Vec<R>> {
        self(results, spec)
    }
}

/// Cuts the final result sequence into pages
pub trait PostQueryPager<R>: Send + Sync {
    fn page(&self, results: Vec<R>, window: &PageWindow) -> QueryResult<Vec<Vec<R>>>;
}

impl<R, F> PostQueryPager<R> for F
where
    F: Fn(Vec<R>, &PageWindow) -> QueryResult<Vec<Vec<R>>> + Send + Sync,
{
    fn page(&self, results: Vec<R>, window: &PageWindow) -> QueryResult<Vec<Vec<R>>> {
        self(results, window)
    }
}

/// Pager that applies the page window as given
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowPager;

impl<R> PostQueryPager<R> for WindowPager {
    fn page(&self, results: Vec<R>, window: &PageWindow) -> QueryResult<Vec<Vec<R>>> {
        Ok(window.apply(results))
    }
}

/// Total result count when permission filtering did not run
pub trait TotalCounter<R>: Send + Sync {
    fn total_result_count(&self, results: &[R]) -> QueryResult<usize>;
}

impl<R, F> TotalCounter<R> for F
where
    F: Fn(&[R]) -> QueryResult<usize> + Send + Sync,
{
    fn total_result_count(&self, results: &[R]) -> QueryResult<usize> {
        self(results)
    }
}

/// Phase switch: whether it runs, and what runs it
struct PhaseSlot<T: ?Sized> {
    required: bool,
    implementation: Option<Arc<T>>,
}

impl<T: ?Sized> PhaseSlot<T> {
    fn skipped() -> Self {
        Self {
            required: false,
            implementation: None,
        }
    }

    fn applied(implementation: Arc<T>) -> Self {
        Self {
            required: true,
            implementation: Some(implementation),
        }
    }

    fn declared() -> Self {
        Self {
            required: true,
            implementation: None,
        }
    }

    /// `None` when the phase is not required
    fn resolve(&self, phase: Phase) -> QueryResult<Option<&T>> {
        if !self.required {
            return Ok(None);
        }
        self.implementation
            .as_deref()
            .map(Some)
            .ok_or(QueryError::Unsupported(phase))
    }
}

impl<T: ?Sized> Clone for PhaseSlot<T> {
    fn clone(&self) -> Self {
        Self {
            required: self.required,
            implementation: self.implementation.clone(),
        }
    }
}

/// Post-query behaviour of one query variant.
///
/// Defaults: no sorting, no permission filtering, paging by [`WindowPager`],
/// total count equal to the number of fetched results.
pub struct PostQueryPhases<R> {
    sorting: PhaseSlot<dyn PostQuerySorter<R>>,
    permissions: PhaseSlot<dyn PermissionFilter<R>>,
    paging: PhaseSlot<dyn PostQueryPager<R>>,
    counter: Option<Arc<dyn TotalCounter<R>>>,
}

impl<R: 'static> PostQueryPhases<R> {
    pub fn new() -> Self {
        Self {
            sorting: PhaseSlot::skipped(),
            permissions: PhaseSlot::skipped(),
            paging: PhaseSlot::applied(Arc::new(WindowPager) as Arc<dyn PostQueryPager<R>>),
            counter: None,
        }
    }

    /// Sort fetched results with `sorter`
    pub fn with_sorting(mut self, sorter: impl PostQuerySorter<R> + 'static) -> Self {
        let sorter: Arc<dyn PostQuerySorter<R>> = Arc::new(sorter);
        self.sorting = PhaseSlot::applied(sorter);
        self
    }

    /// Filter fetched results through `filter` when a token is present
    pub fn with_permissions(mut self, filter: impl PermissionFilter<R> + 'static) -> Self {
        let filter: Arc<dyn PermissionFilter<R>> = Arc::new(filter);
        self.permissions = PhaseSlot::applied(filter);
        self
    }

    /// Page with a custom pager
    pub fn with_paging(mut self, pager: impl PostQueryPager<R> + 'static) -> Self {
        let pager: Arc<dyn PostQueryPager<R>> = Arc::new(pager);
        self.paging = PhaseSlot::applied(pager);
        self
    }

    /// Results arrive already paged; return them as one page
    pub fn without_paging(mut self) -> Self {
        self.paging = PhaseSlot::skipped();
        self
    }

    /// Count totals with `counter` instead of the fetched length
    pub fn with_total_counter(mut self, counter: impl TotalCounter<R> + 'static) -> Self {
        let counter: Arc<dyn TotalCounter<R>> = Arc::new(counter);
        self.counter = Some(counter);
        self
    }

    /// Mark sorting required without supplying a sorter
    pub fn require_sorting(mut self) -> Self {
        self.sorting = PhaseSlot::declared();
        self
    }

    /// Mark permission filtering required without supplying a filter
    pub fn require_permissions(mut self) -> Self {
        self.permissions = PhaseSlot::declared();
        self
    }

    /// Mark paging required without supplying a pager
    pub fn require_paging(mut self) -> Self {
        self.paging = PhaseSlot::declared();
        self
    }
}

impl<R> PostQueryPhases<R> {
    pub fn sorting_required(&self) -> bool {
        self.sorting.required
    }

    pub fn permissions_required(&self) -> bool {
        self.permissions.required
    }

    pub fn paging_required(&self) -> bool {
        self.paging.required
    }

    pub(crate) fn sorter(&self) -> QueryResult<Option<&dyn PostQuerySorter<R>>> {
        self.sorting.resolve(Phase::Sorting)
    }

    pub(crate) fn permission_filter(&self) -> QueryResult<Option<&dyn PermissionFilter<R>>> {
        self.permissions.resolve(Phase::Permissions)
    }

    pub(crate) fn pager(&self) -> QueryResult<Option<&dyn PostQueryPager<R>>> {
        self.paging.resolve(Phase::Paging)
    }

    pub(crate) fn total_result_count(&self, results: &[R]) -> QueryResult<usize> {
        match &self.counter {
            Some(counter) => counter.total_result_count(results),
            None => Ok(results.len()),
        }
    }
}

impl<R: 'static> Default for PostQueryPhases<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for PostQueryPhases<R> {
    fn clone(&self) -> Self {
        Self {
            sorting: self.sorting.clone(),
            permissions: self.permissions.clone(),
            paging: self.paging.clone(),
            counter: self.counter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::ResultBound;

    #[test]
    fn test_default_phases() {
        let phases: PostQueryPhases<u32> = PostQueryPhases::new();
        assert!(!phases.sorting_required());
        assert!(!phases.permissions_required());
        assert!(phases.paging_required());
        assert!(phases.sorter().unwrap().is_none());
        assert!(phases.pager().unwrap().is_some());
    }

    #[test]
    fn test_declared_without_implementation_is_unsupported() {
        let phases: PostQueryPhases<u32> = PostQueryPhases::new()
            .require_sorting()
            .require_permissions()
            .require_paging();

        assert!(matches!(
            phases.sorter(),
            Err(QueryError::Unsupported(Phase::Sorting))
        ));
        assert!(matches!(
            phases.permission_filter(),
            Err(QueryError::Unsupported(Phase::Permissions))
        ));
        assert!(matches!(
            phases.pager(),
            Err(QueryError::Unsupported(Phase::Paging))
        ));
    }

    #[test]
    fn test_closure_sorter() {
        let phases = PostQueryPhases::new().with_sorting(
            |mut results: Vec<u32>, _: &SortSpec| -> QueryResult<Vec<u32>> {
                results.sort_unstable();
                Ok(results)
            },
        );

        let sorter = phases.sorter().unwrap().unwrap();
        assert_eq!(sorter.sort(vec![3, 1, 2], &SortSpec::none()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_window_pager() {
        let window = PageWindow::new(0, ResultBound::Finite(2), 1, 2).unwrap();
        let pages = WindowPager.page(vec![1, 2, 3, 4, 5], &window).unwrap();
        assert_eq!(pages, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_custom_total_counter() {
        let phases = PostQueryPhases::new()
            .with_total_counter(|results: &[u32]| -> QueryResult<usize> { Ok(results.len() * 10) });
        assert_eq!(phases.total_result_count(&[1, 2]).unwrap(), 20);

        let defaults: PostQueryPhases<u32> = PostQueryPhases::new();
        assert_eq!(defaults.total_result_count(&[1, 2]).unwrap(), 2);
    }

    #[test]
    fn test_raw_results_marker() {
        let raw = RawResults::permissioned(vec![1, 2]);
        assert!(raw.permissions_applied());
        assert!(!RawResults::from(vec![1]).permissions_applied());
    }
}
