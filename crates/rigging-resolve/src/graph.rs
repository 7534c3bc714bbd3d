//! Dependency graph management using `petgraph`.
//!
//! Nodes are instance keys; an edge runs from a dependency to the instance
//! that depends on it, so a topological sort yields dependencies first.

use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use rigging_common::error::{Result, RiggingError};
use rigging_common::types::InstanceKey;

/// A dependency graph of component instances.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: Graph<InstanceKey, ()>,
    nodes: HashMap<InstanceKey, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance node, returning the existing node if already present.
    pub fn add_instance(&mut self, key: &InstanceKey) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        let _ = self.nodes.insert(key.clone(), idx);
        idx
    }

    /// Adds a dependency edge: `dependent` depends on `dependency`.
    pub fn add_dependency(&mut self, dependent: NodeIndex, dependency: NodeIndex) {
        if !self.graph.contains_edge(dependency, dependent) {
            let _ = self.graph.add_edge(dependency, dependent, ());
        }
    }

    /// Returns `true` if `key` has a node.
    #[must_use]
    pub fn contains(&self, key: &InstanceKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of instance nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns an ordering of instances with dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::CyclicDependency`] if the graph contains a cycle.
    pub fn resolve_order(&self) -> Result<Vec<InstanceKey>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => Err(RiggingError::CyclicDependency {
                instance: self
                    .graph
                    .node_weight(cycle.node_id())
                    .map_or_else(String::new, ToString::to_string),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rigging_common::types::{ComponentId, ComponentKey};

    use super::*;

    fn key(id: &str) -> InstanceKey {
        InstanceKey::new(ComponentKey::new(ComponentId::new(id)), "")
    }

    fn names(order: &[InstanceKey]) -> Vec<String> {
        order.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_graph_resolves_to_empty() {
        let graph = DependencyGraph::new();
        let order = graph.resolve_order().expect("should resolve");
        assert!(order.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn adding_twice_returns_same_node() {
        let mut graph = DependencyGraph::new();
        let first = graph.add_instance(&key("pilot"));
        let second = graph.add_instance(&key("pilot"));
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(&key("pilot")));
    }

    #[test]
    fn linear_dependency_chain() {
        let mut graph = DependencyGraph::new();
        let pilot = graph.add_instance(&key("pilot"));
        let galley = graph.add_instance(&key("galley"));
        graph.add_dependency(pilot, galley);

        let order = names(&graph.resolve_order().expect("should resolve"));
        assert_eq!(order, vec!["galley", "pilot"]);
    }

    #[test]
    fn diamond_dependency() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_instance(&key("a"));
        let b = graph.add_instance(&key("b"));
        let c = graph.add_instance(&key("c"));
        let d = graph.add_instance(&key("d"));
        graph.add_dependency(a, b);
        graph.add_dependency(a, c);
        graph.add_dependency(b, d);
        graph.add_dependency(c, d);

        let order = names(&graph.resolve_order().expect("should resolve"));
        assert_eq!(order.len(), 4);
        let pos = |name: &str| order.iter().position(|n| n == name).expect(name);
        assert!(pos("d") < pos("b"));
        assert!(pos("d") < pos("c"));
        assert!(pos("b") < pos("a"));
        assert!(pos("c") < pos("a"));
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_instance(&key("a"));
        let b = graph.add_instance(&key("b"));
        graph.add_dependency(a, b);
        graph.add_dependency(a, b);
        assert_eq!(graph.graph.edge_count(), 1);
    }

    #[test]
    fn cycle_detection() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_instance(&key("a"));
        let b = graph.add_instance(&key("b"));
        graph.add_dependency(a, b);
        graph.add_dependency(b, a);

        let err = graph.resolve_order().expect_err("cycle");
        assert!(matches!(err, RiggingError::CyclicDependency { .. }));
        assert!(err.to_string().contains("cyclic"), "got: {err}");
    }

    #[test]
    fn named_instances_are_distinct_nodes() {
        let mut graph = DependencyGraph::new();
        let component = ComponentKey::new(ComponentId::new("echo"));
        let _ = graph.add_instance(&InstanceKey::new(component.clone(), "a"));
        let _ = graph.add_instance(&InstanceKey::new(component, "b"));
        assert_eq!(graph.len(), 2);
    }
}
