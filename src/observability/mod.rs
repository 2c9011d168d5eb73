//! Observability for relkv
//!
//! - Structured logging (one JSON object per line)
//! - Typed pipeline events
//! - Scope-based begin/complete tracing
//!
//! Observability is read-only: nothing here changes query results, and a
//! failed log write is ignored.
//!
//! ```ignore
//! use relkv::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event_with_fields(Event::QueryExecuted, &[("rows", "42")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

#[cfg(test)]
pub(crate) use logger::capture_log;

/// Logs an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Logs an event at its own severity with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
