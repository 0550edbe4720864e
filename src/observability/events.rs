//! Observable events of query execution
//!
//! Events are explicit and typed. Each maps to one log line.

use std::fmt;

use super::logger::Severity;

/// Observable events during canned query execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Execution lifecycle
    /// Execution started
    QueryExecuteBegin,
    /// Execution produced a result bundle
    QueryExecuteComplete,
    /// Execution failed; the error is returned to the caller
    QueryExecuteFailed,
    /// Execution scope dropped without completing
    QueryExecuteIncomplete,
    /// `execute()` called again on a used instance
    QueryReexecuteRejected,

    // Post-query phases
    /// Post-query sort ran
    SortApplied,
    /// Permission filter ran
    PermissionFilterApplied,
    /// Post-query paging ran
    PagingApplied,
}

impl Event {
    /// Returns the event name as it appears in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::QueryExecuteBegin => "QUERY_EXECUTE_BEGIN",
            Event::QueryExecuteComplete => "QUERY_EXECUTE_COMPLETE",
            Event::QueryExecuteFailed => "QUERY_EXECUTE_FAILED",
            Event::QueryExecuteIncomplete => "QUERY_EXECUTE_INCOMPLETE",
            Event::QueryReexecuteRejected => "QUERY_REEXECUTE_REJECTED",
            Event::SortApplied => "SORT_APPLIED",
            Event::PermissionFilterApplied => "PERMISSION_FILTER_APPLIED",
            Event::PagingApplied => "PAGING_APPLIED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryExecuteBegin | Event::QueryExecuteComplete => Severity::Info,
            Event::QueryExecuteFailed => Severity::Error,
            Event::QueryExecuteIncomplete | Event::QueryReexecuteRejected => Severity::Warn,
            Event::SortApplied | Event::PermissionFilterApplied | Event::PagingApplied => {
                Severity::Trace
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::QueryExecuteBegin.as_str(), "QUERY_EXECUTE_BEGIN");
        assert_eq!(
            Event::PermissionFilterApplied.to_string(),
            "PERMISSION_FILTER_APPLIED"
        );
    }

    #[test]
    fn test_phase_events_are_trace() {
        assert_eq!(Event::SortApplied.severity(), Severity::Trace);
        assert_eq!(Event::PagingApplied.severity(), Severity::Trace);
        assert_eq!(Event::QueryExecuteFailed.severity(), Severity::Error);
    }
}
