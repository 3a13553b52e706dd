//! Role inheritance graph

use std::collections::{HashMap, VecDeque};

/// Directed graph over declared roles.
///
/// An edge `A -> B` means "A inherits B's permissions". Cycles are legal
/// input: the closure traversal in the resolver guards against revisits, so
/// a cyclic policy resolves and terminates. [`has_cycle`](Self::has_cycle)
/// reports whether any cycle exists, for diagnostics.
///
/// # Examples
///
/// ```rust
/// use rbac::RoleGraph;
///
/// let mut graph = RoleGraph::new();
/// graph.add_role("editor");
/// graph.add_role("viewer");
/// graph.add_inheritance("editor", "viewer");
///
/// assert_eq!(graph.inherits("editor"), ["viewer"]);
/// assert!(!graph.has_cycle());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    /// Role to the roles it inherits, declaration order preserved
    edges: HashMap<String, Vec<String>>,
}

impl RoleGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a role node with no inheritance edges
    pub fn add_role(&mut self, role: impl Into<String>) {
        self.edges.entry(role.into()).or_default();
    }

    /// Adds an inheritance edge; duplicate edges collapse
    pub fn add_inheritance(&mut self, role: impl Into<String>, inherits: impl Into<String>) {
        let inherits = inherits.into();
        let parents = self.edges.entry(role.into()).or_default();
        if !parents.contains(&inherits) {
            parents.push(inherits);
        }
    }

    /// Returns the roles `role` directly inherits, in declaration order
    pub fn inherits(&self, role: &str) -> &[String] {
        self.edges.get(role).map(Vec::as_slice).unwrap_or_default()
    }

    /// Checks whether a role is in the graph
    pub fn contains(&self, role: &str) -> bool {
        self.edges.contains_key(role)
    }

    /// Iterates every role in the graph
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Returns the number of roles
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Checks if the graph has no roles
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Reports whether any inheritance cycle exists.
    ///
    /// Kahn-style in-degree elimination: nodes left standing after the
    /// sweep sit on a cycle.
    pub fn has_cycle(&self) -> bool {
        let mut in_degree: HashMap<&str, usize> =
            self.edges.keys().map(|role| (role.as_str(), 0)).collect();
        for parents in self.edges.values() {
            for parent in parents {
                if let Some(degree) = in_degree.get_mut(parent.as_str()) {
                    *degree += 1;
                }
            }
        }

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(role, _)| *role)
            .collect();

        let mut swept = 0usize;
        while let Some(role) = queue.pop_front() {
            swept += 1;
            if let Some(parents) = self.edges.get(role) {
                for parent in parents {
                    if let Some(degree) = in_degree.get_mut(parent.as_str()) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(parent);
                        }
                    }
                }
            }
        }

        swept != self.edges.len()
    }
}
