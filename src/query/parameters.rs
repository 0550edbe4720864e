//! Query parameters
//!
//! Everything one execution needs: the opaque bean the raw fetch
//! understands, the page window, the sort keys, who is asking, and whether
//! totals should be counted. Immutable once built.

use uuid::Uuid;

use super::errors::QueryResult;
use super::sort::SortSpec;
use crate::config::QueryConfig;
use crate::paging::{PageWindow, PagingRequest};

/// Parameters for one canned query execution
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters<P> {
    parameter_bean: P,
    page_window: PageWindow,
    sort_spec: SortSpec,
    authentication_token: Option<String>,
    request_total_count_max: i32,
    query_execution_id: Option<String>,
}

impl<P> QueryParameters<P> {
    /// Parameters with an unbounded single page, no sort, no caller
    /// identity and no total count
    pub fn new(parameter_bean: P) -> Self {
        Self {
            parameter_bean,
            page_window: PageWindow::default(),
            sort_spec: SortSpec::none(),
            authentication_token: None,
            request_total_count_max: 0,
            query_execution_id: None,
        }
    }

    /// Parameters for a caller's paging request, using configured defaults
    pub fn from_request(
        parameter_bean: P,
        request: &PagingRequest,
        config: &QueryConfig,
    ) -> QueryResult<Self> {
        let mut parameters = Self::new(parameter_bean)
            .with_page_window(config.page_window(request)?)
            .with_total_count_max(config.total_count_max(request));
        parameters.query_execution_id = request.query_execution_id.clone();
        Ok(parameters)
    }

    pub fn with_page_window(mut self, page_window: PageWindow) -> Self {
        self.page_window = page_window;
        self
    }

    pub fn with_sort(mut self, sort_spec: SortSpec) -> Self {
        self.sort_spec = sort_spec;
        self
    }

    /// Identify the caller; enables permission filtering for variants that
    /// declare it
    pub fn with_authentication_token(mut self, token: impl Into<String>) -> Self {
        self.authentication_token = Some(token.into());
        self
    }

    /// Count totals up to `max`; `max <= 0` disables counting
    pub fn with_total_count_max(mut self, max: i32) -> Self {
        self.request_total_count_max = max;
        self
    }

    pub fn with_query_execution_id(mut self, id: impl Into<String>) -> Self {
        self.query_execution_id = Some(id.into());
        self
    }

    pub fn parameter_bean(&self) -> &P {
        &self.parameter_bean
    }

    pub fn page_window(&self) -> &PageWindow {
        &self.page_window
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort_spec
    }

    pub fn authentication_token(&self) -> Option<&str> {
        self.authentication_token.as_deref()
    }

    pub fn request_total_count_max(&self) -> i32 {
        self.request_total_count_max
    }

    /// True if the caller wants a total result count
    pub fn total_count_requested(&self) -> bool {
        self.request_total_count_max > 0
    }

    pub fn query_execution_id(&self) -> Option<&str> {
        self.query_execution_id.as_deref()
    }

    /// The caller's execution id, or a fresh UUID v4
    pub fn query_execution_id_or_new(&self) -> String {
        match self.query_execution_id() {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        }
    }
}
