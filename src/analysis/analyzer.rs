//! Run health analysis
//!
//! A read-only audit over a run's stored claims. More permissive than the
//! write path: it reports inconsistencies instead of rejecting them, which
//! is how claims that bypassed validation (bulk imports, fixtures) surface.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::claim::Claim;
use crate::hierarchy::{HierarchyRegistry, HierarchyResult};

/// A passed predicate whose declared parents are not all passed in the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    pub predicate: String,
    pub missing: Vec<String>,
}

impl fmt::Display for Orphan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (missing: {})", self.predicate, self.missing.join(", "))
    }
}

/// Aggregate view of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunAnalysis {
    pub correlation_id: String,
    pub total_logs: usize,
    /// Predicates with at least one passed claim, first-seen order
    pub passed_predicates: Vec<String>,
    /// Predicates with at least one failed claim, first-seen order
    pub failed_predicates: Vec<String>,
    pub orphans: Vec<Orphan>,
    /// True iff there are no orphans
    pub healthy: bool,
}

impl RunAnalysis {
    /// Orphans rendered as `predicate (missing: p1, p2)`
    pub fn orphan_descriptions(&self) -> Vec<String> {
        self.orphans.iter().map(|o| o.to_string()).collect()
    }
}

pub struct RunAnalyzer<'a> {
    registry: &'a HierarchyRegistry,
}

impl<'a> RunAnalyzer<'a> {
    pub fn new(registry: &'a HierarchyRegistry) -> Self {
        Self { registry }
    }

    /// Partitions the run and finds orphans.
    ///
    /// A predicate counts as passed if any of its claims passed, regardless
    /// of later failures; it may therefore appear in both lists.
    pub fn analyze(&self, correlation_id: &str, claims: &[Claim]) -> HierarchyResult<RunAnalysis> {
        let mut passed: Vec<String> = Vec::new();
        let mut failed: Vec<String> = Vec::new();
        let mut passed_set: HashSet<&str> = HashSet::new();
        let mut failed_set: HashSet<&str> = HashSet::new();

        for claim in claims {
            if claim.passed {
                if passed_set.insert(&claim.predicate) {
                    passed.push(claim.predicate.clone());
                }
            } else if failed_set.insert(&claim.predicate) {
                failed.push(claim.predicate.clone());
            }
        }

        let mut orphans: Vec<Orphan> = Vec::new();
        for predicate in &passed {
            let missing: Vec<String> = self
                .registry
                .parents(predicate)?
                .into_iter()
                .filter(|parent| !passed_set.contains(parent.as_str()))
                .collect();
            if !missing.is_empty() {
                orphans.push(Orphan {
                    predicate: predicate.clone(),
                    missing,
                });
            }
        }

        Ok(RunAnalysis {
            correlation_id: correlation_id.to_string(),
            total_logs: claims.len(),
            passed_predicates: passed,
            failed_predicates: failed,
            healthy: orphans.is_empty(),
            orphans,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::NewClaim;
    use chrono::Utc;

    fn stamp(claim: NewClaim) -> Claim {
        Claim::stamp(claim, Utc::now())
    }

    fn setup_registry() -> HierarchyRegistry {
        let registry = HierarchyRegistry::new();
        registry.register("a", &[]).unwrap();
        registry.register("b", &["a"]).unwrap();
        registry
    }

    #[test]
    fn test_empty_run_is_healthy() {
        let registry = setup_registry();
        let analysis = RunAnalyzer::new(&registry).analyze("r0", &[]).unwrap();
        assert_eq!(analysis.total_logs, 0);
        assert!(analysis.passed_predicates.is_empty());
        assert!(analysis.healthy);
    }

    #[test]
    fn test_partition() {
        let registry = setup_registry();
        let claims = vec![
            stamp(NewClaim::passed("e", "a", "r1", "s")),
            stamp(NewClaim::failed("e", "b", "r1", "s")),
            stamp(NewClaim::failed("e", "b", "r1", "s")),
        ];
        let analysis = RunAnalyzer::new(&registry).analyze("r1", &claims).unwrap();
        assert_eq!(analysis.total_logs, 3);
        assert_eq!(analysis.passed_predicates, vec!["a"]);
        assert_eq!(analysis.failed_predicates, vec!["b"]);
        assert!(analysis.healthy);
    }

    #[test]
    fn test_any_pass_counts_as_passed() {
        let registry = setup_registry();
        let claims = vec![
            stamp(NewClaim::passed("e", "a", "r1", "s")),
            stamp(NewClaim::failed("e", "a", "r1", "s")),
        ];
        let analysis = RunAnalyzer::new(&registry).analyze("r1", &claims).unwrap();
        assert_eq!(analysis.passed_predicates, vec!["a"]);
        assert_eq!(analysis.failed_predicates, vec!["a"]);
    }

    #[test]
    fn test_orphan_detected() {
        let registry = setup_registry();
        let claims = vec![stamp(NewClaim::passed("e", "b", "r1", "s"))];
        let analysis = RunAnalyzer::new(&registry).analyze("r1", &claims).unwrap();

        assert!(!analysis.healthy);
        assert_eq!(analysis.orphan_descriptions(), vec!["b (missing: a)"]);
    }

    #[test]
    fn test_orphan_ignores_claim_order() {
        // The audit only asks whether parents passed somewhere in the run.
        let registry = setup_registry();
        let claims = vec![
            stamp(NewClaim::passed("e", "b", "r1", "s")),
            stamp(NewClaim::passed("e", "a", "r1", "s")),
        ];
        let analysis = RunAnalyzer::new(&registry).analyze("r1", &claims).unwrap();
        assert!(analysis.healthy);
    }

    #[test]
    fn test_orphan_lists_all_missing_parents() {
        let registry = setup_registry();
        registry.register("c", &["a", "b"]).unwrap();
        let claims = vec![stamp(NewClaim::passed("e", "c", "r1", "s"))];
        let analysis = RunAnalyzer::new(&registry).analyze("r1", &claims).unwrap();
        assert_eq!(analysis.orphan_descriptions(), vec!["c (missing: a, b)"]);
    }
}
