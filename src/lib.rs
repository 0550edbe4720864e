//! canned-query - Single-use query execution with post-query phases
//!
//! Fetch once, then sort, permission-trim and page the results.

pub mod config;
pub mod observability;
pub mod paging;
pub mod permission;
pub mod query;

pub use config::QueryConfig;
pub use paging::{PageWindow, PagingRequest, ResultBound};
pub use permission::{CountBounds, IncrementalPermissionFilter, PermissionEvaluator, PermissionFilter};
pub use query::{CannedQuery, PostQueryPhases, QueryError, QueryFactory, QueryParameters, QueryResult, QueryResults, SortSpec};
