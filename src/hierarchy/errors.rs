//! Hierarchy registration errors
//!
//! Error codes:
//! - PROOF_HIERARCHY_CYCLE
//! - PROOF_HIERARCHY_SELF_PARENT
//! - PROOF_HIERARCHY_EMPTY_ID
//! - PROOF_HIERARCHY_INTERNAL

use thiserror::Error;

/// Result type for hierarchy operations
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Registration rejected by the hierarchy registry.
///
/// A rejected registration leaves the registry exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The new parent set would make the predicate its own ancestor.
    #[error("Registering '{predicate}' would create a cycle: {}", path.join(" -> "))]
    Cycle {
        predicate: String,
        /// Ancestor chain from the predicate back to itself.
        path: Vec<String>,
    },

    #[error("Predicate '{0}' cannot name itself as a parent")]
    SelfParent(String),

    #[error("Predicate identifiers must be non-empty")]
    EmptyIdentifier,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HierarchyError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            HierarchyError::Cycle { .. } => "PROOF_HIERARCHY_CYCLE",
            HierarchyError::SelfParent(_) => "PROOF_HIERARCHY_SELF_PARENT",
            HierarchyError::EmptyIdentifier => "PROOF_HIERARCHY_EMPTY_ID",
            HierarchyError::Internal(_) => "PROOF_HIERARCHY_INTERNAL",
        }
    }
}
