//! Observable engine events
//!
//! Events are explicit and typed; their string names are stable.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Hierarchy
    /// Predicate declared or re-declared
    PredicateRegistered,
    /// Registration rejected (cycle, self-parent, empty id)
    HierarchyRejected,

    // Claims
    /// Claim validated and stored
    ClaimAccepted,
    /// Claim rejected by the schema or hierarchy check
    ClaimRejected,
    /// Claims bulk-loaded without validation
    ClaimsImported,

    // Runs
    /// First claim for a correlation identifier
    RunCreated,
    /// Run dropped on request
    RunClosed,
    /// Runs dropped by the retention policy
    RunsEvicted,

    // Analysis
    RunAnalyzed,
    /// Analysis found passed claims with missing parents
    OrphansDetected,

    ConfigLoaded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::PredicateRegistered => "PREDICATE_REGISTERED",
            Event::HierarchyRejected => "HIERARCHY_REJECTED",
            Event::ClaimAccepted => "CLAIM_ACCEPTED",
            Event::ClaimRejected => "CLAIM_REJECTED",
            Event::ClaimsImported => "CLAIMS_IMPORTED",
            Event::RunCreated => "RUN_CREATED",
            Event::RunClosed => "RUN_CLOSED",
            Event::RunsEvicted => "RUNS_EVICTED",
            Event::RunAnalyzed => "RUN_ANALYZED",
            Event::OrphansDetected => "ORPHANS_DETECTED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Severity the engine logs this event at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ClaimAccepted | Event::RunCreated => Severity::Trace,
            Event::ClaimRejected | Event::HierarchyRejected | Event::OrphansDetected => {
                Severity::Warn
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
