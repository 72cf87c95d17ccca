//! Read-only views over stored runs
//!
//! Both views are pure functions of a run's claims and the hierarchy;
//! running them twice without new claims gives identical results.

mod analyzer;
mod proof_tree;

pub use analyzer::{Orphan, RunAnalysis, RunAnalyzer};
pub use proof_tree::{ProofNode, ProofTree, ProofTreeBuilder, FAIL_SYMBOL, PASS_SYMBOL};
