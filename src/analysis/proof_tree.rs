//! Proof tree construction
//!
//! Walks the hierarchy from each root, in registration order, and lists
//! the predicates that held in a run. A predicate's children are expanded
//! only if the predicate itself passed, and only children that passed are
//! descended into. Each predicate is rendered at most once per tree.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::claim::Claim;
use crate::hierarchy::{HierarchyRegistry, HierarchyResult};

pub const PASS_SYMBOL: &str = "✓";
pub const FAIL_SYMBOL: &str = "✗";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofNode {
    pub depth: usize,
    pub passed: bool,
    pub predicate: String,
}

impl ProofNode {
    pub fn symbol(&self) -> &'static str {
        if self.passed {
            PASS_SYMBOL
        } else {
            FAIL_SYMBOL
        }
    }
}

/// Flat, depth-first ordered tree of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofTree {
    pub correlation_id: String,
    pub nodes: Vec<ProofNode>,
}

impl ProofTree {
    /// Nodes as `(depth, passed, predicate)` tuples
    pub fn entries(&self) -> Vec<(usize, bool, &str)> {
        self.nodes
            .iter()
            .map(|n| (n.depth, n.passed, n.predicate.as_str()))
            .collect()
    }

    /// Indented text, two spaces per level, one line per node.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProofTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}{} {}", "  ".repeat(node.depth), node.symbol(), node.predicate)?;
        }
        Ok(())
    }
}

pub struct ProofTreeBuilder<'a> {
    registry: &'a HierarchyRegistry,
}

impl<'a> ProofTreeBuilder<'a> {
    pub fn new(registry: &'a HierarchyRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self, correlation_id: &str, claims: &[Claim]) -> HierarchyResult<ProofTree> {
        let passed: HashSet<&str> = claims
            .iter()
            .filter(|c| c.passed)
            .map(|c| c.predicate.as_str())
            .collect();

        let mut visited: HashSet<String> = HashSet::new();
        let mut nodes = Vec::new();

        for root in self.registry.roots()? {
            let mut stack = vec![(0usize, root)];

            while let Some((depth, predicate)) = stack.pop() {
                if !visited.insert(predicate.clone()) {
                    continue;
                }

                let held = passed.contains(predicate.as_str());
                if held {
                    let children = self.registry.children(&predicate)?;
                    // Reversed so the first child is rendered first.
                    for child in children.into_iter().rev() {
                        if passed.contains(child.as_str()) && !visited.contains(&child) {
                            stack.push((depth + 1, child));
                        }
                    }
                }

                nodes.push(ProofNode {
                    depth,
                    passed: held,
                    predicate,
                });
            }
        }

        Ok(ProofTree {
            correlation_id: correlation_id.to_string(),
            nodes,
        })
    }
}
