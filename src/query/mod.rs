//! Canned query subsystem
//!
//! A canned query is a named, parameterized query that runs exactly once:
//!
//! 1. Raw fetch of candidates ([`RawQuery`])
//! 2. Optional post-query sort
//! 3. Optional permission trimming for the calling identity
//! 4. Optional paging into a window of pages
//!
//! The variant decides which of steps 2-4 apply ([`PostQueryPhases`]).
//! Results are frozen into a [`QueryResults`] bundle.

mod errors;
mod factory;
mod parameters;
mod phases;
mod pipeline;
mod results;
mod sort;

pub use errors::{Phase, QueryError, QueryResult, Severity};
pub use factory::QueryFactory;
pub use parameters::QueryParameters;
pub use phases::{
    PostQueryPager, PostQueryPhases, PostQuerySorter, RawQuery, RawResults, TotalCounter,
    WindowPager,
};
pub use pipeline::{CannedQuery, ExecutionState};
pub use results::QueryResults;
pub use sort::{KeyedSorter, SortDirection, SortKey, SortSpec};
