//! Dependency graph derived from registered descriptors.
//!
//! The graph is rebuilt from the registry whenever it is needed (in
//! practice once per run, after all stages have self-registered) and is
//! the input for both the cycle detector and the resolver.

use crate::registry::StageDescriptor;
use std::collections::{BTreeMap, BTreeSet};

/// Directed graph: stage name to the set of names it requires.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Builds the graph from descriptors. Missing requires means an
    /// empty edge set.
    #[must_use]
    pub fn from_descriptors<'a>(descriptors: impl IntoIterator<Item = &'a StageDescriptor>) -> Self {
        let edges = descriptors
            .into_iter()
            .map(|d| (d.name.clone(), d.requires.iter().cloned().collect()))
            .collect();
        Self { edges }
    }

    /// Returns the names this stage requires, if the stage is known.
    #[must_use]
    pub fn requires(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    /// Returns every node in the graph, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns every (stage, missing-dependency) pair where a required
    /// name is not a node of the graph.
    #[must_use]
    pub fn unknown_dependencies(&self) -> Vec<(String, String)> {
        self.edges
            .iter()
            .flat_map(|(name, requires)| {
                requires
                    .iter()
                    .filter(|dep| !self.edges.contains_key(*dep))
                    .map(|dep| (name.clone(), dep.clone()))
            })
            .collect()
    }

    /// Finds dependency cycles by depth-first traversal.
    ///
    /// Each cycle is reported as the path slice from the first occurrence
    /// of the repeated node through the current node, closed by repeating
    /// the entry node. This yields one representative cycle per affected
    /// traversal root, not every rotation of it. An empty result means
    /// the graph is acyclic.
    #[must_use]
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = BTreeSet::new();
        let mut path = Vec::new();

        for start in self.edges.keys() {
            self.dfs(start, &mut path, &mut visited, &mut cycles);
        }

        cycles
    }

    fn dfs(
        &self,
        node: &str,
        path: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        if let Some(first) = path.iter().position(|n| n == node) {
            // The minimal repeating segment, closed on the entry node.
            let mut cycle: Vec<String> = path[first..].to_vec();
            cycle.push(node.to_string());
            cycles.push(cycle);
            return;
        }
        if !visited.insert(node.to_string()) {
            return;
        }

        path.push(node.to_string());
        for dep in self.edges.get(node).into_iter().flatten() {
            self.dfs(dep, path, visited, cycles);
        }
        path.pop();
    }
}
