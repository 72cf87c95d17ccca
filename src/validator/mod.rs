//! Claim validation subsystem
//!
//! The write path every claim goes through before it is stored.
//!
//! # Invariants
//!
//! - A stored passed claim is preceded in its run by a passed claim for
//!   each of its declared parents
//! - Schema is checked before hierarchy
//! - Rejections store nothing
//! - Failed claims are stored regardless of their ancestors

mod errors;
#[allow(clippy::module_inception)]
mod validator;

pub use errors::{ClaimError, ClaimResult, HierarchyViolation};
pub use validator::ClaimValidator;
