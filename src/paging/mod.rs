//! Paging subsystem
//!
//! Describes which slice of a result sequence a caller wants and cuts that
//! slice out after the query has run.
//!
//! # Window algorithm
//!
//! 1. `first = skip + (page_number - 1) * page_size`
//! 2. Nothing skipped and the page is larger than the input: one page, all results
//! 3. `first` past the end: no pages
//! 4. Otherwise fill pages of `page_size` from `first` until
//!    `page_size * page_count` results are taken or the input ends

mod bound;
mod request;
mod window;

pub use bound::ResultBound;
pub use request::PagingRequest;
pub use window::{PageWindow, DEFAULT_PAGE_COUNT, DEFAULT_PAGE_NUMBER, DEFAULT_SKIP_RESULTS};
