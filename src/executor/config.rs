//! Executor configuration
//!
//! ```json
//! { "max_rows": 10000, "log_level": "TRACE" }
//! ```
//!
//! Both fields are optional. With no `max_rows` an operator may produce any
//! number of rows.

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, Logger, Severity};

use super::errors::{ExecutorError, ExecutorResult};

/// Configuration for a `QueryExecutor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Cap on the rows any single operator may produce
    pub max_rows: Option<usize>,
    /// Lowest severity the logger writes
    pub log_level: Severity,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_rows: None,
            log_level: Severity::Info,
        }
    }
}

impl ExecutorConfig {
    /// Parses a configuration document
    pub fn from_json_str(json: &str) -> ExecutorResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExecutorError::invalid_config(format!("Invalid JSON: {}", e)))
    }

    /// Sets the row cap
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Sets the log threshold
    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = level;
        self
    }

    /// Applies process-wide settings (the log threshold)
    pub fn apply(&self) {
        Logger::set_min_severity(self.log_level);
        let max_rows = self
            .max_rows
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
        log_event_with_fields(
            Event::ConfigApplied,
            &[("log_level", self.log_level.as_str()), ("max_rows", &max_rows)],
        );
    }
}
