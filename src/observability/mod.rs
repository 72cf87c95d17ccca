//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//! - Typed engine events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on engine results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use prooflog::observability::{log_event, Event, Severity};
//!
//! log_event(Severity::Info, Event::RunAnalyzed, &[("correlation_id", "r1")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Logs `event` at its own severity if that reaches `min_severity`.
pub fn log_event(min_severity: Severity, event: Event, fields: &[(&str, &str)]) {
    let severity = event.severity();
    if severity >= min_severity {
        Logger::log(severity, event.as_str(), fields);
    }
}
