//! Incremental permission filtering
//!
//! Per-item checks are assumed expensive (an ACL or policy lookup each), so
//! evaluation stops as soon as enough permitted items are found.

use super::filter::{CountBounds, PermissionFilter, PermissionedPage};
use crate::paging::ResultBound;
use crate::query::QueryResult;

/// Decides whether the caller identified by a token may see one item
pub trait PermissionEvaluator<R>: Send + Sync {
    fn is_permitted(&self, item: &R, authentication_token: &str) -> QueryResult<bool>;
}

impl<R, F> PermissionEvaluator<R> for F
where
    F: Fn(&R, &str) -> QueryResult<bool> + Send + Sync,
{
    fn is_permitted(&self, item: &R, authentication_token: &str) -> QueryResult<bool> {
        self(item, authentication_token)
    }
}

/// Permission filter that evaluates items one at a time, in order
pub struct IncrementalPermissionFilter<E> {
    evaluator: E,
}

impl<E> IncrementalPermissionFilter<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl<R, E> PermissionFilter<R> for IncrementalPermissionFilter<E>
where
    E: PermissionEvaluator<R>,
{
    fn apply(
        &self,
        results: Vec<R>,
        authentication_token: &str,
        requested: ResultBound,
    ) -> QueryResult<PermissionedPage<R>> {
        let available = results.len();
        let capacity = requested.finite().map_or(available, |n| n.min(available));

        let mut page = Vec::with_capacity(capacity);
        let mut evaluated = 0;
        let mut candidates = results.into_iter();

        while !requested.is_satisfied_by(page.len()) {
            let Some(item) = candidates.next() else {
                break;
            };
            evaluated += 1;

            if self.evaluator.is_permitted(&item, authentication_token)? {
                page.push(item);
            }
        }

        // Anything not evaluated might still be permitted
        let found = page.len();
        let total = CountBounds::new(found, found + (available - evaluated));

        Ok(PermissionedPage {
            page,
            total,
            permissions_applied: true,
            evaluated,
        })
    }
}
