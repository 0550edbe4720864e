//! Observability for query execution
//!
//! - Structured logging (one JSON object per line)
//! - Typed execution events
//! - An execution scope that logs begin/complete/failed
//!
//! Logging never changes execution: write failures are ignored and errors
//! are still returned to the caller after they are logged.
//!
//! # Usage
//!
//! ```ignore
//! use canned_query::observability::{Logger, Severity};
//!
//! // Show per-phase trace lines as well
//! Logger::set_min_severity(Severity::Trace);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ExecutionScope;
