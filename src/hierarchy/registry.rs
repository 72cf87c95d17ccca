//! Predicate hierarchy registry
//!
//! Holds the static parent/child graph between predicate identifiers.
//! Child sets are derived from the parent declarations, so the final
//! shape does not depend on the order predicates were registered in.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use super::errors::{HierarchyError, HierarchyResult};

/// One predicate declaration as it appears in a hierarchy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDecl {
    pub id: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

impl PredicateDecl {
    pub fn new(id: impl Into<String>, parents: &[&str]) -> Self {
        Self {
            id: id.into(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A whole hierarchy, applied in document order.
///
/// ```json
/// { "predicates": [ { "id": "auth_ok" }, { "id": "fetch_ok", "parents": ["auth_ok"] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDocument {
    #[serde(default)]
    pub predicates: Vec<PredicateDecl>,
}

#[derive(Debug)]
struct Node {
    parents: Vec<String>,
    /// Position of the first registration
    index: usize,
}

#[derive(Debug, Default)]
struct HierarchyState {
    nodes: HashMap<String, Node>,
    order: Vec<String>,
    children: HashMap<String, HashSet<String>>,
}

impl HierarchyState {
    fn parents_of(&self, predicate: &str) -> &[String] {
        self.nodes
            .get(predicate)
            .map(|n| n.parents.as_slice())
            .unwrap_or(&[])
    }

    /// Finds an ancestor chain leading from `parents` back to `predicate`.
    ///
    /// Iterative walk up the parent relation; `predicate`'s own current
    /// parents are never followed, so a re-registration is checked against
    /// its new parent set only.
    fn find_cycle(&self, predicate: &str, parents: &[String]) -> Option<Vec<String>> {
        let mut came_from: HashMap<&str, &str> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();

        for p in parents {
            if seen.insert(p.as_str()) {
                stack.push(p.as_str());
            }
        }

        while let Some(current) = stack.pop() {
            for ancestor in self.parents_of(current) {
                if ancestor == predicate {
                    let mut chain = vec![current];
                    let mut cursor = current;
                    while let Some(&prev) = came_from.get(cursor) {
                        chain.push(prev);
                        cursor = prev;
                    }
                    chain.reverse();

                    let mut path = Vec::with_capacity(chain.len() + 2);
                    path.push(predicate.to_string());
                    path.extend(chain.into_iter().map(str::to_string));
                    path.push(predicate.to_string());
                    return Some(path);
                }
                if seen.insert(ancestor.as_str()) {
                    came_from.insert(ancestor.as_str(), current);
                    stack.push(ancestor.as_str());
                }
            }
        }

        None
    }
}

/// Registry of predicates and their declared parents.
///
/// Expected to be populated before claim traffic starts and read-mostly
/// afterwards, but late registration is allowed.
#[derive(Debug, Default)]
pub struct HierarchyRegistry {
    state: RwLock<HierarchyState>,
}

impl HierarchyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `predicate` with the given parents.
    ///
    /// Re-registering an identifier replaces its parent set; child links
    /// held by the old parents are withdrawn, links from other predicates
    /// that name this one are untouched. Duplicate parents are collapsed.
    ///
    /// # Errors
    ///
    /// Rejects empty identifiers, a predicate naming itself, and any parent
    /// set that would make the predicate its own ancestor.
    pub fn register(&self, predicate: &str, parents: &[&str]) -> HierarchyResult<()> {
        if predicate.is_empty() || parents.iter().any(|p| p.is_empty()) {
            return Err(HierarchyError::EmptyIdentifier);
        }
        if parents.contains(&predicate) {
            return Err(HierarchyError::SelfParent(predicate.to_string()));
        }

        let mut unique: Vec<String> = Vec::with_capacity(parents.len());
        for p in parents {
            if !unique.iter().any(|u| u == p) {
                unique.push(p.to_string());
            }
        }

        let mut guard = self.state.write().map_err(|_| poisoned())?;
        let state = &mut *guard;

        if let Some(path) = state.find_cycle(predicate, &unique) {
            return Err(HierarchyError::Cycle {
                predicate: predicate.to_string(),
                path,
            });
        }

        let previous = match state.nodes.get_mut(predicate) {
            Some(node) => Some(std::mem::replace(&mut node.parents, unique.clone())),
            None => {
                let index = state.order.len();
                state.order.push(predicate.to_string());
                state.nodes.insert(
                    predicate.to_string(),
                    Node {
                        parents: unique.clone(),
                        index,
                    },
                );
                None
            }
        };

        for old in previous.unwrap_or_default() {
            if let Some(set) = state.children.get_mut(&old) {
                set.remove(predicate);
                if set.is_empty() {
                    state.children.remove(&old);
                }
            }
        }
        for parent in unique {
            state
                .children
                .entry(parent)
                .or_default()
                .insert(predicate.to_string());
        }

        Ok(())
    }

    /// Applies every declaration of a document in order.
    ///
    /// Stops at the first rejected declaration; earlier ones stay applied.
    pub fn register_document(&self, document: &HierarchyDocument) -> HierarchyResult<()> {
        for decl in &document.predicates {
            let parents: Vec<&str> = decl.parents.iter().map(String::as_str).collect();
            self.register(&decl.id, &parents)?;
        }
        Ok(())
    }

    /// Declared parents of `predicate`; empty when unknown.
    pub fn parents(&self, predicate: &str) -> HierarchyResult<Vec<String>> {
        let state = self.read_state()?;
        Ok(state.parents_of(predicate).to_vec())
    }

    /// Predicates naming `predicate` as a parent, in registration order.
    pub fn children(&self, predicate: &str) -> HierarchyResult<Vec<String>> {
        let state = self.read_state()?;
        let mut children: Vec<(usize, String)> = state
            .children
            .get(predicate)
            .map(|set| {
                set.iter()
                    .map(|c| {
                        let index = state.nodes.get(c).map(|n| n.index).unwrap_or(usize::MAX);
                        (index, c.clone())
                    })
                    .collect()
            })
            .unwrap_or_default();
        children.sort();
        Ok(children.into_iter().map(|(_, c)| c).collect())
    }

    /// Registered predicates without parents, in registration order.
    pub fn roots(&self) -> HierarchyResult<Vec<String>> {
        let state = self.read_state()?;
        Ok(state
            .order
            .iter()
            .filter(|p| state.parents_of(p).is_empty())
            .cloned()
            .collect())
    }

    /// Whether `predicate` has been registered
    pub fn contains(&self, predicate: &str) -> bool {
        self.state
            .read()
            .map(|s| s.nodes.contains_key(predicate))
            .unwrap_or(false)
    }

    /// All registered predicates in registration order
    pub fn predicates(&self) -> Vec<String> {
        self.state.read().map(|s| s.order.clone()).unwrap_or_default()
    }

    /// Number of registered predicates
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.order.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.state.write();
            panic!("poisoning hierarchy lock");
        }));
    }

    fn read_state(&self) -> HierarchyResult<RwLockReadGuard<'_, HierarchyState>> {
        self.state.read().map_err(|_| poisoned())
    }
}

fn poisoned() -> HierarchyError {
    HierarchyError::Internal("Lock poisoned".into())
}
