//! Claim rejection errors
//!
//! Error codes:
//! - PROOF_SCHEMA_INVALID (REJECT)
//! - PROOF_HIERARCHY_VIOLATION (REJECT)
//! - PROOF_INTERNAL
//!
//! A rejected claim is never stored, not even partially.

use thiserror::Error;

use crate::claim::SchemaError;
use crate::hierarchy::HierarchyError;
use crate::store::StoreError;

/// Result type for claim submission
pub type ClaimResult<T> = Result<T, ClaimError>;

/// A passed claim arrived before all of its declared parents held in the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Predicate '{predicate}' claimed passed before its parents held: {}", missing.join(", "))]
pub struct HierarchyViolation {
    pub predicate: String,
    pub correlation_id: String,
    /// Parents without a prior passed claim, in declaration order
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyViolation),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClaimError {
    pub fn code(&self) -> &'static str {
        match self {
            ClaimError::Schema(_) => "PROOF_SCHEMA_INVALID",
            ClaimError::Hierarchy(_) => "PROOF_HIERARCHY_VIOLATION",
            ClaimError::Internal(_) => "PROOF_INTERNAL",
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, ClaimError::Schema(_))
    }

    pub fn is_hierarchy(&self) -> bool {
        matches!(self, ClaimError::Hierarchy(_))
    }
}

impl From<HierarchyError> for ClaimError {
    fn from(e: HierarchyError) -> Self {
        match e {
            HierarchyError::Internal(msg) => ClaimError::Internal(msg),
            other => ClaimError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ClaimError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Internal(msg) => ClaimError::Internal(msg),
        }
    }
}
