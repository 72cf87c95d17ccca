//! Write-path claim validator
//!
//! Two checks, in order:
//! 1. Schema: the core fields are present and typed
//! 2. Hierarchy (passed claims only): every declared parent already has a
//!    passed claim earlier in the same run
//!
//! Failed claims skip the hierarchy check; a failure is always reportable.

use chrono::{DateTime, Utc};

use super::errors::{ClaimError, ClaimResult, HierarchyViolation};
use crate::claim::{check_claim, Claim, NewClaim};
use crate::hierarchy::HierarchyRegistry;
use crate::store::{AppendOutcome, RunStore};

/// Validates claims against the registered hierarchy.
///
/// Does not mutate claims. Validation is deterministic for a given
/// registry and run prefix.
pub struct ClaimValidator<'a> {
    registry: &'a HierarchyRegistry,
}

impl<'a> ClaimValidator<'a> {
    pub fn new(registry: &'a HierarchyRegistry) -> Self {
        Self { registry }
    }

    /// Schema check for a typed submission.
    pub fn check_schema(&self, claim: &NewClaim) -> ClaimResult<()> {
        check_claim(claim)?;
        Ok(())
    }

    /// Hierarchy check against the claims already stored for the run.
    ///
    /// Parents are conjunctive: every one of them needs a prior passed claim.
    /// Unregistered predicates have no parents and pass trivially.
    /// A registry that cannot be read rejects the claim as `Internal`.
    pub fn check_hierarchy(&self, claim: &NewClaim, prior: &[Claim]) -> ClaimResult<()> {
        if !claim.passed {
            return Ok(());
        }

        let parents = self.registry.parents(&claim.predicate)?;
        if parents.is_empty() {
            return Ok(());
        }

        let missing: Vec<String> = parents
            .into_iter()
            .filter(|parent| !prior.iter().any(|c| c.passed && &c.predicate == parent))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(HierarchyViolation {
                predicate: claim.predicate.clone(),
                correlation_id: claim.correlation_id.clone(),
                missing,
            }
            .into())
        }
    }

    /// Runs both checks against a run prefix without storing anything.
    pub fn validate(&self, claim: &NewClaim, prior: &[Claim]) -> ClaimResult<()> {
        self.check_schema(claim)?;
        self.check_hierarchy(claim, prior)?;
        Ok(())
    }

    /// Validates and, on success, appends the claim stamped with `now`.
    ///
    /// The hierarchy check and the append happen under the run's lock.
    pub fn submit(
        &self,
        store: &RunStore,
        claim: NewClaim,
        now: DateTime<Utc>,
    ) -> ClaimResult<AppendOutcome> {
        self.check_schema(&claim)?;

        let correlation_id = claim.correlation_id.clone();
        store.append_checked(&correlation_id, now, |prior| {
            self.check_hierarchy(&claim, prior)?;
            Ok::<_, ClaimError>(Claim::stamp(claim, now))
        })
    }
}
