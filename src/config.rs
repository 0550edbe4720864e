//! Query configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "default_page_size": 50,
//!   "max_page_size": 1000,
//!   "default_request_total_count_max": 0
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::paging::{
    PageWindow, PagingRequest, ResultBound, DEFAULT_PAGE_COUNT, DEFAULT_PAGE_NUMBER,
    DEFAULT_SKIP_RESULTS,
};
use crate::query::{QueryError, QueryResult};

/// Paging defaults and limits applied to caller requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Page size when a request names none (absent = unbounded)
    #[serde(default)]
    pub default_page_size: Option<usize>,

    /// Largest page size a request may ask for (absent = no limit)
    #[serde(default)]
    pub max_page_size: Option<usize>,

    /// Total count limit when a request does not ask for one
    #[serde(default)]
    pub default_request_total_count_max: i32,
}

impl QueryConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| QueryError::config(format!("Failed to read config: {}", e)))?;

        let config: QueryConfig = serde_json::from_str(&content)
            .map_err(|e| QueryError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate page size settings
    pub fn validate(&self) -> QueryResult<()> {
        if self.default_page_size == Some(0) {
            return Err(QueryError::config("default_page_size must be > 0"));
        }

        if self.max_page_size == Some(0) {
            return Err(QueryError::config("max_page_size must be > 0"));
        }

        if let Some(max) = self.max_page_size {
            match self.default_page_size {
                Some(default) if default > max => {
                    return Err(QueryError::config(format!(
                        "default_page_size {} exceeds max_page_size {}",
                        default, max
                    )));
                }
                None => {
                    return Err(QueryError::config(
                        "default_page_size is required when max_page_size is set",
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Page window for a caller request: first page only, one page
    pub fn page_window(&self, request: &PagingRequest) -> QueryResult<PageWindow> {
        let page_size = match request.max_items {
            Some(requested) => {
                if let Some(max) = self.max_page_size {
                    if requested > max {
                        return Err(QueryError::LimitExceeded { requested, max });
                    }
                }
                ResultBound::Finite(requested)
            }
            None => ResultBound::from(self.default_page_size),
        };

        PageWindow::new(
            request.skip_count.unwrap_or(DEFAULT_SKIP_RESULTS),
            page_size,
            DEFAULT_PAGE_NUMBER,
            DEFAULT_PAGE_COUNT,
        )
    }

    /// Total count limit for a caller request
    pub fn total_count_max(&self, request: &PagingRequest) -> i32 {
        if request.request_total_count_max != 0 {
            request.request_total_count_max
        } else {
            self.default_request_total_count_max
        }
    }
}
