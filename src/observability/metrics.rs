//! Engine counters
//!
//! - Counters only, monotonic
//! - Reset only when the engine is constructed
//! - Relaxed atomics; exact totals, no cross-counter consistency

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    claims_accepted: AtomicU64,
    claims_rejected_schema: AtomicU64,
    claims_rejected_hierarchy: AtomicU64,
    claims_imported: AtomicU64,
    runs_created: AtomicU64,
    runs_evicted: AtomicU64,
    analyses: AtomicU64,
    unhealthy_analyses: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_claims_accepted(&self) {
        self.claims_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_schema_rejections(&self) {
        self.claims_rejected_schema.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_hierarchy_rejections(&self) {
        self.claims_rejected_hierarchy.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_claims_imported(&self, count: u64) {
        self.claims_imported.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_runs_created(&self) {
        self.runs_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_runs_evicted(&self, count: u64) {
        self.runs_evicted.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one analysis and whether it came back healthy
    pub fn record_analysis(&self, healthy: bool) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
        if !healthy {
            self.unhealthy_analyses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            claims_accepted: self.claims_accepted.load(Ordering::Relaxed),
            claims_rejected_schema: self.claims_rejected_schema.load(Ordering::Relaxed),
            claims_rejected_hierarchy: self.claims_rejected_hierarchy.load(Ordering::Relaxed),
            claims_imported: self.claims_imported.load(Ordering::Relaxed),
            runs_created: self.runs_created.load(Ordering::Relaxed),
            runs_evicted: self.runs_evicted.load(Ordering::Relaxed),
            analyses: self.analyses.load(Ordering::Relaxed),
            unhealthy_analyses: self.unhealthy_analyses.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of every counter, for export to alerting pipelines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub claims_accepted: u64,
    pub claims_rejected_schema: u64,
    pub claims_rejected_hierarchy: u64,
    pub claims_imported: u64,
    pub runs_created: u64,
    pub runs_evicted: u64,
    pub analyses: u64,
    pub unhealthy_analyses: u64,
}

impl MetricsSnapshot {
    pub fn claims_rejected(&self) -> u64 {
        self.claims_rejected_schema + self.claims_rejected_hierarchy
    }
}
