//! Canned query execution pipeline
//!
//! Execution flow (strict order):
//! 1. Raw fetch (exactly once)
//! 2. Post-query sort (if the variant requires it)
//! 3. Permission filtering (if a token is present and the variant requires it)
//! 4. Keep the total count only if it was requested
//! 5. Has-more-items from the filtered, unpaged sequence
//! 6. Paging (if the variant requires it), else one page of everything
//! 7. Freeze the result bundle
//!
//! An instance executes at most once. Some permission filters have side
//! effects (usage accounting) that must not be charged twice.

use std::sync::{Arc, Mutex, PoisonError};

use super::errors::{Phase, QueryError, QueryResult};
use super::parameters::QueryParameters;
use super::phases::{PostQueryPhases, RawQuery};
use super::results::QueryResults;
use crate::observability::{Event, ExecutionScope, Logger};
use crate::permission::CountBounds;

/// Execution state of a canned query instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// `execute()` has not been called
    NotExecuted,
    /// An `execute()` call is in progress
    Executing,
    /// `execute()` returned, successfully or not
    Executed,
}

struct Slot<R> {
    state: ExecutionState,
    results: Option<Arc<QueryResults<R>>>,
}

/// A single-use query: one raw fetch shaped by the variant's post-query phases
pub struct CannedQuery<P, R> {
    parameters: QueryParameters<P>,
    query_execution_id: String,
    raw_query: Box<dyn RawQuery<P, R>>,
    phases: PostQueryPhases<R>,
    slot: Mutex<Slot<R>>,
}

impl<P, R> CannedQuery<P, R> {
    /// Creates a query for `parameters` run under `query_execution_id`.
    ///
    /// The id is written into the parameters as well, so the raw fetch, the
    /// logs and the result bundle all see the same one.
    pub fn new(
        parameters: QueryParameters<P>,
        query_execution_id: impl Into<String>,
        raw_query: impl RawQuery<P, R> + 'static,
        phases: PostQueryPhases<R>,
    ) -> Self {
        let query_execution_id = query_execution_id.into();
        Self {
            parameters: parameters.with_query_execution_id(query_execution_id.clone()),
            query_execution_id,
            raw_query: Box::new(raw_query),
            phases,
            slot: Mutex::new(Slot {
                state: ExecutionState::NotExecuted,
                results: None,
            }),
        }
    }

    /// Creates a query run under the parameters' execution id, or a fresh one
    pub fn from_parameters(
        parameters: QueryParameters<P>,
        raw_query: impl RawQuery<P, R> + 'static,
        phases: PostQueryPhases<R>,
    ) -> Self {
        let query_execution_id = parameters.query_execution_id_or_new();
        Self::new(parameters, query_execution_id, raw_query, phases)
    }

    pub fn parameters(&self) -> &QueryParameters<P> {
        &self.parameters
    }

    pub fn query_execution_id(&self) -> &str {
        &self.query_execution_id
    }

    pub fn phases(&self) -> &PostQueryPhases<R> {
        &self.phases
    }

    pub fn state(&self) -> ExecutionState {
        self.lock_slot().state
    }

    /// Results of a successful execution, if any
    pub fn results(&self) -> Option<Arc<QueryResults<R>>> {
        self.lock_slot().results.clone()
    }

    /// Runs the query.
    ///
    /// Fails with [`QueryError::AlreadyExecuted`] on any call after the
    /// first, including calls that race with a running execution. A failed
    /// execution also consumes the instance.
    pub fn execute(&self) -> QueryResult<Arc<QueryResults<R>>> {
        {
            let mut slot = self.lock_slot();
            if slot.state != ExecutionState::NotExecuted {
                Logger::event(
                    Event::QueryReexecuteRejected,
                    &[("query_execution_id", self.query_execution_id.as_str())],
                );
                return Err(QueryError::AlreadyExecuted);
            }
            slot.state = ExecutionState::Executing;
        }

        let scope = ExecutionScope::begin(&self.query_execution_id);
        let outcome = self.run().map(Arc::new);

        {
            let mut slot = self.lock_slot();
            slot.state = ExecutionState::Executed;
            if let Ok(results) = &outcome {
                slot.results = Some(Arc::clone(results));
            }
        }

        match &outcome {
            Ok(results) => {
                let page_count = results.page_count().to_string();
                let paged_result_count = results.paged_result_count().to_string();
                scope.complete(&[
                    ("page_count", page_count.as_str()),
                    ("paged_result_count", paged_result_count.as_str()),
                    ("has_more_items", bool_str(results.has_more_items())),
                    ("permissions_applied", bool_str(results.permissions_applied())),
                ]);
            }
            Err(err) => scope.fail(err),
        }

        outcome
    }

    fn run(&self) -> QueryResult<QueryResults<R>> {
        let parameters = &self.parameters;
        let window = parameters.page_window();

        // Step 1: Raw fetch
        let raw = self
            .raw_query
            .query_and_filter(parameters)?
            .ok_or(QueryError::NullResults)?;
        let already_permissioned = raw.permissions_applied();
        let mut results = raw.into_items();

        // Step 2: Post-query sort
        if let Some(sorter) = self.phases.sorter()? {
            results = sorter.sort(results, parameters.sort_spec())?;
            Logger::event(
                Event::SortApplied,
                &[("sort_keys", parameters.sort_spec().len().to_string().as_str())],
            );
        }

        // Step 3: Permissions
        let (total_result_count, permissions_applied) = match parameters.authentication_token() {
            Some(token) if self.phases.permissions_required() => {
                let filter = self
                    .phases
                    .permission_filter()?
                    .ok_or(QueryError::Unsupported(Phase::Permissions))?;

                // One extra to detect results beyond the requested pages
                let requested = window.results_required_for_paging().increment();
                let filtered = filter.apply(results, token, requested)?;

                let requested_str = requested.to_string();
                let returned_str = filtered.page.len().to_string();
                let evaluated_str = filtered.evaluated.to_string();
                Logger::event(
                    Event::PermissionFilterApplied,
                    &[
                        ("requested", requested_str.as_str()),
                        ("returned", returned_str.as_str()),
                        ("evaluated", evaluated_str.as_str()),
                    ],
                );

                results = filtered.page;
                (filtered.total, filtered.permissions_applied)
            }
            _ => {
                let count = self.phases.total_result_count(&results)?;
                (CountBounds::exact(count), already_permissioned)
            }
        };

        // Step 4: Total count only if requested
        let total_result_count = parameters
            .total_count_requested()
            .then_some(total_result_count);

        // Step 5: Must be measured before paging truncates
        let has_more_items = window
            .results_required_for_paging()
            .is_exceeded_by(results.len());

        // Step 6: Paging
        let pages = match self.phases.pager()? {
            Some(pager) => {
                let pages = pager.page(results, window)?;
                Logger::event(
                    Event::PagingApplied,
                    &[("page_count", pages.len().to_string().as_str())],
                );
                pages
            }
            None => vec![results],
        };

        // Step 7: Freeze
        Ok(QueryResults::new(
            self.query_execution_id.clone(),
            pages,
            has_more_items,
            total_result_count,
            permissions_applied,
        ))
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Slot<R>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
