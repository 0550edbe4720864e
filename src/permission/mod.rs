//! Permission subsystem
//!
//! Post-query permission trimming. The pipeline asks a [`PermissionFilter`]
//! for at most N permitted items (N = results needed for paging, plus one
//! to detect further results) and records the count bounds it returns.
//!
//! [`IncrementalPermissionFilter`] is the standard implementation: it walks
//! candidates in order and stops as soon as N permitted items are found.

mod evaluator;
mod filter;

pub use evaluator::{IncrementalPermissionFilter, PermissionEvaluator};
pub use filter::{CountBounds, PermissionFilter, PermissionedPage};
