//! Caller-facing paging request
//!
//! The shape a listing endpoint receives: an optional skip count, an optional
//! maximum number of items, how far to count the total, and an optional
//! execution id to correlate with an earlier query.

use serde::{Deserialize, Serialize};

/// Paging request as supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingRequest {
    /// Results to skip (absent = 0)
    #[serde(default)]
    pub skip_count: Option<usize>,

    /// Maximum items in the page (absent = configured default)
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Count total results up to this many (<= 0 = do not count)
    #[serde(default)]
    pub request_total_count_max: i32,

    /// Correlation id from a previous execution
    #[serde(default)]
    pub query_execution_id: Option<String>,
}

impl PagingRequest {
    /// A request for `max_items` results after `skip_count`
    pub fn new(skip_count: usize, max_items: usize) -> Self {
        Self {
            skip_count: Some(skip_count),
            max_items: Some(max_items),
            request_total_count_max: 0,
            query_execution_id: None,
        }
    }

    /// Ask for total counts up to `max`
    pub fn with_total_count_max(mut self, max: i32) -> Self {
        self.request_total_count_max = max;
        self
    }

    /// Reuse a known execution id
    pub fn with_query_execution_id(mut self, id: impl Into<String>) -> Self {
        self.query_execution_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let request: PagingRequest = serde_json::from_str(r#"{"max_items": 25}"#).unwrap();
        assert_eq!(request.skip_count, None);
        assert_eq!(request.max_items, Some(25));
        assert_eq!(request.request_total_count_max, 0);
        assert!(request.query_execution_id.is_none());
    }

    #[test]
    fn test_builder() {
        let request = PagingRequest::new(10, 20)
            .with_total_count_max(1000)
            .with_query_execution_id("q-1");
        assert_eq!(request.skip_count, Some(10));
        assert_eq!(request.request_total_count_max, 1000);
        assert_eq!(request.query_execution_id.as_deref(), Some("q-1"));
    }
}
