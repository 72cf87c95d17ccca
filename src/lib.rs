//! prooflog - falsifiable predicate logging for failure-prone workflows
//!
//! Each checked precondition is recorded as a claim about a named
//! predicate. Claims asserting success are accepted only once every
//! declared parent predicate has held earlier in the same run, so a run's
//! stored claims always form a consistent proof of what held.

pub mod analysis;
pub mod claim;
pub mod cli;
pub mod config;
pub mod engine;
pub mod hierarchy;
pub mod observability;
pub mod store;
pub mod validator;

pub use analysis::{Orphan, ProofNode, ProofTree, RunAnalysis};
pub use claim::{Claim, NewClaim, SchemaError};
pub use config::EngineConfig;
pub use engine::Engine;
pub use hierarchy::{HierarchyDocument, HierarchyError};
pub use validator::{ClaimError, HierarchyViolation};
