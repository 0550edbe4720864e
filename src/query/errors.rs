//! Query error types
//!
//! Error codes:
//! - CQ_ALREADY_EXECUTED (STATE)
//! - CQ_NULL_RESULTS (DEFECT)
//! - CQ_TOTAL_COUNT_NOT_REQUESTED (STATE)
//! - CQ_CARDINALITY_MISMATCH (STATE)
//! - CQ_UNSUPPORTED_PHASE (DEFECT)
//! - CQ_INVALID_PAGE_WINDOW (REJECT)
//! - CQ_LIMIT_EXCEEDED (REJECT)
//! - CQ_CONFIG_ERROR (REJECT)
//! - CQ_EVALUATION_FAILED (DEFECT)
//!
//! No error is retried at this layer. Every failure surfaces synchronously
//! to the caller of `execute()` or of the accessor that raised it.

use std::fmt;

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The caller used an instance or bundle in a state that forbids the call
    State,
    /// A collaborator broke its contract; not recoverable locally
    Defect,
    /// The request itself was rejected before execution
    Reject,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::State => "STATE",
            Severity::Defect => "DEFECT",
            Severity::Reject => "REJECT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Post-query phase named in [`QueryError::Unsupported`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sorting,
    Permissions,
    Paging,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Sorting => "sorting",
            Phase::Permissions => "permissions",
            Phase::Paging => "paging",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canned query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    // ==================
    // State Errors
    // ==================
    /// `execute()` called on an instance that already ran (or is running)
    #[error("This query instance has already been used. It can only be used to query once.")]
    AlreadyExecuted,

    /// Total count read although the parameters did not request it
    #[error("Total results were not requested in parameters.")]
    TotalCountNotRequested,

    /// `page()` or `single_result()` on a bundle of the wrong shape
    #[error("Expected {expected}, found {actual}")]
    CardinalityMismatch {
        expected: &'static str,
        actual: String,
    },

    // ==================
    // Defects
    // ==================
    /// Raw fetch produced no sequence at all
    #[error("Execution returned 'null' results")]
    NullResults,

    /// A phase was declared required but no implementation was supplied
    #[error("Post-query {0} is required but no implementation was supplied")]
    Unsupported(Phase),

    /// A permission evaluator failed for an item
    #[error("Permission evaluation failed: {0}")]
    Evaluation(String),

    // ==================
    // Rejections
    // ==================
    /// Page window attributes out of range
    #[error("Invalid page window: {0}")]
    InvalidPageWindow(String),

    /// Requested page size above the configured maximum
    #[error("Requested {requested} items per page exceeds maximum of {max}")]
    LimitExceeded { requested: usize, max: usize },

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl QueryError {
    /// Create an invalid page window error
    pub fn invalid_page_window(reason: impl Into<String>) -> Self {
        Self::InvalidPageWindow(reason.into())
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Create an evaluation error
    pub fn evaluation(reason: impl Into<String>) -> Self {
        Self::Evaluation(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExecuted => "CQ_ALREADY_EXECUTED",
            Self::TotalCountNotRequested => "CQ_TOTAL_COUNT_NOT_REQUESTED",
            Self::CardinalityMismatch { .. } => "CQ_CARDINALITY_MISMATCH",
            Self::NullResults => "CQ_NULL_RESULTS",
            Self::Unsupported(_) => "CQ_UNSUPPORTED_PHASE",
            Self::Evaluation(_) => "CQ_EVALUATION_FAILED",
            Self::InvalidPageWindow(_) => "CQ_INVALID_PAGE_WINDOW",
            Self::LimitExceeded { .. } => "CQ_LIMIT_EXCEEDED",
            Self::Config(_) => "CQ_CONFIG_ERROR",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            Self::AlreadyExecuted | Self::TotalCountNotRequested | Self::CardinalityMismatch { .. } => {
                Severity::State
            }
            Self::NullResults | Self::Unsupported(_) | Self::Evaluation(_) => Severity::Defect,
            Self::InvalidPageWindow(_) | Self::LimitExceeded { .. } | Self::Config(_) => {
                Severity::Reject
            }
        }
    }

    /// Returns whether the caller misused an instance or bundle
    pub fn is_state_error(&self) -> bool {
        self.severity() == Severity::State
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(QueryError::AlreadyExecuted.code(), "CQ_ALREADY_EXECUTED");
        assert_eq!(QueryError::NullResults.code(), "CQ_NULL_RESULTS");
        assert_eq!(
            QueryError::Unsupported(Phase::Sorting).code(),
            "CQ_UNSUPPORTED_PHASE"
        );
        assert_eq!(
            QueryError::TotalCountNotRequested.code(),
            "CQ_TOTAL_COUNT_NOT_REQUESTED"
        );
    }

    #[test]
    fn test_severity_mapping() {
        assert!(QueryError::AlreadyExecuted.is_state_error());
        assert!(QueryError::TotalCountNotRequested.is_state_error());
        assert_eq!(QueryError::NullResults.severity(), Severity::Defect);
        assert_eq!(
            QueryError::LimitExceeded { requested: 10, max: 5 }.severity(),
            Severity::Reject
        );
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::Unsupported(Phase::Permissions);
        assert_eq!(
            err.to_string(),
            "Post-query permissions is required but no implementation was supplied"
        );

        let err = QueryError::CardinalityMismatch {
            expected: "exactly one page",
            actual: "3 pages".to_string(),
        };
        assert!(err.to_string().contains("3 pages"));
    }
}
