//! Predicate hierarchy subsystem
//!
//! Predicates are declared once, with the parents that must have held
//! earlier in the same run before the predicate itself may be claimed
//! as passed.
//!
//! # Design Principles
//!
//! - Parent requirements are conjunctive
//! - Child sets are derived, never declared
//! - Cycles are rejected at registration time
//! - Unknown predicates are leaves, not errors

mod errors;
mod registry;

pub use errors::{HierarchyError, HierarchyResult};
pub use registry::{HierarchyDocument, HierarchyRegistry, PredicateDecl};
