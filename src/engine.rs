//! Predicate logging engine
//!
//! One explicit instance owns the hierarchy, the run store and the
//! counters. Construct it once at startup and share it by reference (or
//! `Arc`) with every call site; independent instances never see each
//! other's state.
//!
//! ```ignore
//! let engine = Engine::new();
//! engine.register("auth_ok", &[])?;
//! engine.register("fetch_ok", &["auth_ok"])?;
//!
//! engine.log(NewClaim::passed("token valid", "auth_ok", "r1", "domain.auth"))?;
//! engine.log(NewClaim::passed("rows fetched", "fetch_ok", "r1", "domain.io"))?;
//!
//! assert!(engine.analyze_run("r1")?.healthy);
//! println!("{}", engine.build_proof_tree("r1")?);
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::{ProofTree, ProofTreeBuilder, RunAnalysis, RunAnalyzer};
use crate::claim::{parse_claim, Claim, NewClaim};
use crate::config::EngineConfig;
use crate::hierarchy::{HierarchyDocument, HierarchyRegistry, HierarchyResult};
use crate::observability::{log_event, Event, MetricsRegistry, MetricsSnapshot, Severity};
use crate::store::{AppendOutcome, RunStore};
use crate::validator::{ClaimError, ClaimResult, ClaimValidator};

#[derive(Debug)]
pub struct Engine {
    registry: HierarchyRegistry,
    store: RunStore,
    metrics: MetricsRegistry,
    min_log_severity: Severity,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default configuration: INFO logging, unbounded runs.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            registry: HierarchyRegistry::new(),
            store: RunStore::new(config.retention_policy()),
            metrics: MetricsRegistry::new(),
            min_log_severity: config.min_log_severity,
        }
    }

    /// Fresh correlation identifier for callers that have none
    pub fn new_correlation_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn registry(&self) -> &HierarchyRegistry {
        &self.registry
    }

    /// Direct store access. Appending through it bypasses validation.
    pub fn store(&self) -> &RunStore {
        &self.store
    }

    // Registration

    /// Declares a predicate and the parents that must hold before it.
    pub fn register(&self, predicate: &str, parents: &[&str]) -> HierarchyResult<()> {
        match self.registry.register(predicate, parents) {
            Ok(()) => {
                let joined = parents.join(",");
                self.emit(
                    Event::PredicateRegistered,
                    &[("predicate", predicate), ("parents", joined.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                self.emit(
                    Event::HierarchyRejected,
                    &[
                        ("code", e.code()),
                        ("predicate", predicate),
                        ("reason", e.to_string().as_str()),
                    ],
                );
                Err(e)
            }
        }
    }

    /// Registers every declaration of a hierarchy document, in order.
    pub fn register_all(&self, document: &HierarchyDocument) -> HierarchyResult<()> {
        for decl in &document.predicates {
            let parents: Vec<&str> = decl.parents.iter().map(String::as_str).collect();
            self.register(&decl.id, &parents)?;
        }
        Ok(())
    }

    // Claim submission

    /// Validates a claim and stores it with the current time.
    ///
    /// # Errors
    ///
    /// `ClaimError::Schema` or `ClaimError::Hierarchy`; nothing is stored.
    pub fn log(&self, claim: NewClaim) -> ClaimResult<()> {
        self.log_at(claim, Utc::now())
    }

    /// As `log`, with an explicit acceptance time.
    pub fn log_at(&self, claim: NewClaim, now: DateTime<Utc>) -> ClaimResult<()> {
        let predicate = claim.predicate.clone();
        let correlation_id = claim.correlation_id.clone();
        let passed = claim.passed;

        let validator = ClaimValidator::new(&self.registry);
        match validator.submit(&self.store, claim, now) {
            Ok(outcome) => {
                self.metrics.increment_claims_accepted();
                self.emit(
                    Event::ClaimAccepted,
                    &[
                        ("correlation_id", correlation_id.as_str()),
                        ("passed", if passed { "true" } else { "false" }),
                        ("predicate", predicate.as_str()),
                    ],
                );
                self.record_append(&correlation_id, &outcome);
                Ok(())
            }
            Err(e) => {
                self.record_rejection(&e, &predicate, &correlation_id);
                Err(e)
            }
        }
    }

    /// Schema-checks a raw JSON claim, then logs it.
    pub fn log_json(&self, value: &Value) -> ClaimResult<()> {
        match parse_claim(value) {
            Ok(claim) => self.log(claim),
            Err(e) => {
                let err = ClaimError::from(e);
                let predicate = value.get("predicate").and_then(Value::as_str).unwrap_or("");
                let correlation_id = value
                    .get("correlation_id")
                    .or_else(|| value.get("correlationId"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                self.record_rejection(&err, predicate, correlation_id);
                Err(err)
            }
        }
    }

    /// Stores claims without validation, keeping their timestamps.
    ///
    /// This is the path for historical data and fixtures; inconsistencies
    /// it lets through are reported by `analyze_run` as orphans.
    pub fn import_claims<I>(&self, claims: I) -> ClaimResult<usize>
    where
        I: IntoIterator<Item = Claim>,
    {
        let now = Utc::now();
        let mut count = 0usize;
        for claim in claims {
            let correlation_id = claim.correlation_id.clone();
            let outcome = self.store.append(&correlation_id, claim, now)?;
            self.record_append(&correlation_id, &outcome);
            count += 1;
        }

        self.metrics.add_claims_imported(count as u64);
        self.emit(Event::ClaimsImported, &[("count", count.to_string().as_str())]);
        Ok(count)
    }

    // Queries

    /// The run's claims in insertion order; empty for an unknown run.
    pub fn get_logs_for_run(&self, correlation_id: &str) -> ClaimResult<Vec<Claim>> {
        Ok(self.store.get(correlation_id)?)
    }

    pub fn analyze_run(&self, correlation_id: &str) -> ClaimResult<RunAnalysis> {
        let claims = self.get_logs_for_run(correlation_id)?;
        let analysis = RunAnalyzer::new(&self.registry).analyze(correlation_id, &claims)?;

        self.metrics.record_analysis(analysis.healthy);
        self.emit(
            Event::RunAnalyzed,
            &[
                ("correlation_id", correlation_id),
                ("healthy", if analysis.healthy { "true" } else { "false" }),
                ("total_logs", analysis.total_logs.to_string().as_str()),
            ],
        );
        if !analysis.healthy {
            let orphans = analysis.orphan_descriptions().join("; ");
            self.emit(
                Event::OrphansDetected,
                &[("correlation_id", correlation_id), ("orphans", orphans.as_str())],
            );
        }

        Ok(analysis)
    }

    pub fn build_proof_tree(&self, correlation_id: &str) -> ClaimResult<ProofTree> {
        let claims = self.get_logs_for_run(correlation_id)?;
        Ok(ProofTreeBuilder::new(&self.registry).build(correlation_id, &claims)?)
    }

    /// Proof tree as indented text
    pub fn render_proof_tree(&self, correlation_id: &str) -> ClaimResult<String> {
        Ok(self.build_proof_tree(correlation_id)?.render())
    }

    /// The run as JSON Lines, one stored claim per line.
    pub fn export_run(&self, correlation_id: &str) -> ClaimResult<String> {
        let mut out = String::new();
        for claim in self.get_logs_for_run(correlation_id)? {
            let line = serde_json::to_string(&claim)
                .map_err(|e| ClaimError::Internal(format!("JSON error: {}", e)))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Live runs in creation order
    pub fn run_ids(&self) -> Vec<String> {
        self.store.run_ids().unwrap_or_default()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // Retention

    /// Drops a run and its claims. Returns whether it existed.
    pub fn close_run(&self, correlation_id: &str) -> bool {
        let closed = self.store.remove(correlation_id).unwrap_or(false);
        if closed {
            self.emit(Event::RunClosed, &[("correlation_id", correlation_id)]);
        }
        closed
    }

    /// Drops runs idle past the configured TTL.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> Vec<String> {
        let evicted = self.store.evict_idle(now).unwrap_or_default();
        self.record_evictions(&evicted);
        evicted
    }

    fn record_append(&self, correlation_id: &str, outcome: &AppendOutcome) {
        if outcome.created {
            self.metrics.increment_runs_created();
            self.emit(Event::RunCreated, &[("correlation_id", correlation_id)]);
        }
        self.record_evictions(&outcome.evicted);
    }

    fn record_evictions(&self, evicted: &[String]) {
        if evicted.is_empty() {
            return;
        }
        self.metrics.add_runs_evicted(evicted.len() as u64);
        self.emit(
            Event::RunsEvicted,
            &[
                ("count", evicted.len().to_string().as_str()),
                ("runs", evicted.join(",").as_str()),
            ],
        );
    }

    fn record_rejection(&self, err: &ClaimError, predicate: &str, correlation_id: &str) {
        match err {
            ClaimError::Schema(_) => self.metrics.increment_schema_rejections(),
            ClaimError::Hierarchy(_) => self.metrics.increment_hierarchy_rejections(),
            ClaimError::Internal(_) => {}
        }
        self.emit(
            Event::ClaimRejected,
            &[
                ("code", err.code()),
                ("correlation_id", correlation_id),
                ("predicate", predicate),
                ("reason", err.to_string().as_str()),
            ],
        );
    }

    fn emit(&self, event: Event, fields: &[(&str, &str)]) {
        log_event(self.min_log_severity, event, fields);
    }
}
