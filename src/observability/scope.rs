//! Execution scope: begin/complete/failed logging around one execution
//!
//! - `QUERY_EXECUTE_BEGIN` on creation
//! - `QUERY_EXECUTE_COMPLETE` with a result summary on `complete()`
//! - `QUERY_EXECUTE_FAILED` with the error code on `fail()`
//! - `QUERY_EXECUTE_INCOMPLETE` on drop if neither was called

use std::time::Instant;

use super::events::Event;
use super::logger::Logger;
use crate::query::QueryError;

/// Logs the lifecycle of one query execution
pub struct ExecutionScope {
    query_execution_id: String,
    started: Instant,
    finished: bool,
}

impl ExecutionScope {
    /// Start a scope; logs `QUERY_EXECUTE_BEGIN`
    pub fn begin(query_execution_id: &str) -> Self {
        Logger::event(
            Event::QueryExecuteBegin,
            &[("query_execution_id", query_execution_id)],
        );

        Self {
            query_execution_id: query_execution_id.to_string(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Milliseconds since the scope began
    pub fn elapsed_ms(&self) -> String {
        self.started.elapsed().as_millis().to_string()
    }

    /// Mark the execution complete, with summary fields
    pub fn complete(mut self, fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms();

        let mut all_fields: Vec<(&str, &str)> = vec![
            ("query_execution_id", self.query_execution_id.as_str()),
            ("elapsed_ms", elapsed.as_str()),
        ];
        all_fields.extend(fields.iter().copied());

        Logger::event(Event::QueryExecuteComplete, &all_fields);
    }

    /// Mark the execution failed
    pub fn fail(mut self, error: &QueryError) {
        self.finished = true;
        let message = error.to_string();

        Logger::event(
            Event::QueryExecuteFailed,
            &[
                ("query_execution_id", self.query_execution_id.as_str()),
                ("code", error.code()),
                ("reason", message.as_str()),
            ],
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::event(
                Event::QueryExecuteIncomplete,
                &[
                    ("query_execution_id", self.query_execution_id.as_str()),
                    ("reason", "scope dropped without completion"),
                ],
            );
        }
    }
}
