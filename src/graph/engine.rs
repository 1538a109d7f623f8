//! LineageGraph - core graph topology.
//!
//! Stores the deduplicated node and edge sets using petgraph's StableGraph
//! for adjacency, alongside insertion-ordered vectors that preserve the
//! first-encounter order of the input scan (the default rendering and
//! search order). String ids map to internal indices through hash maps,
//! so every public operation speaks node/edge ids, never indices.
//!
//! The graph may contain cycles; every traversal here is an explicit
//! worklist algorithm guarded by a visited set.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use std::collections::{HashMap, HashSet};

use super::edge::{Edge, edge_id};
use super::node::{Node, NodeKind};

/// The lineage graph: deduplicated nodes, directed edges, adjacency.
///
/// Node and edge weights are slots into the insertion-ordered `nodes` /
/// `edges` vectors, keeping petgraph topology and display-order storage in
/// sync without duplicating the payloads.
#[derive(Debug, Default)]
pub struct LineageGraph {
    /// Adjacency; weights are slots into `nodes` and `edges`.
    graph: StableGraph<usize, usize, Directed>,
    /// Nodes in first-encounter order.
    nodes: Vec<Node>,
    /// Edges in first-encounter order.
    edges: Vec<Edge>,
    /// Node id to petgraph index.
    node_index: HashMap<String, NodeIndex>,
    /// Edge id to petgraph index.
    edge_index: HashMap<String, EdgeIndex>,
}

impl LineageGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Build operations (crate-internal, driven by the builder)
    // =========================================================================

    /// Ensure a node exists for `name`, creating it on first encounter.
    /// The first occurrence wins for attached metadata.
    pub(crate) fn ensure_node(&mut self, name: &str, kind: NodeKind) -> NodeIndex {
        if let Some(&index) = self.node_index.get(name) {
            return index;
        }
        let slot = self.nodes.len();
        self.nodes.push(Node::new(name, kind));
        let index = self.graph.add_node(slot);
        self.node_index.insert(name.to_owned(), index);
        index
    }

    /// Insert a directed edge, deduplicated by its `"{source}->{target}"`
    /// id. Returns false for duplicates or unknown endpoints.
    pub(crate) fn insert_edge(&mut self, source: &str, target: &str) -> bool {
        let id = edge_id(source, target);
        if self.edge_index.contains_key(&id) {
            return false;
        }
        let (Some(&source_index), Some(&target_index)) =
            (self.node_index.get(source), self.node_index.get(target))
        else {
            return false;
        };
        let slot = self.edges.len();
        self.edges.push(Edge::new(source, target));
        let index = self.graph.add_edge(source_index, target_index, slot);
        self.edge_index.insert(id, index);
        true
    }

    /// Recompute every node's `has_outgoing` flag. Called once after all
    /// edges exist — a node can gain outgoing edges from being another
    /// record's parent, not just from its own `child` list.
    pub(crate) fn recompute_outgoing(&mut self) {
        let flags: Vec<bool> = self
            .nodes
            .iter()
            .map(|node| {
                self.node_index
                    .get(&node.id)
                    .map(|&index| {
                        self.graph
                            .edges_directed(index, Direction::Outgoing)
                            .next()
                            .is_some()
                    })
                    .unwrap_or(false)
            })
            .collect();
        for (node, has_outgoing) in self.nodes.iter_mut().zip(flags) {
            node.has_outgoing = has_outgoing;
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in first-encounter order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in first-encounter order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index
            .get(id)
            .and_then(|&index| self.graph.node_weight(index))
            .map(|&slot| &self.nodes[slot])
    }

    /// Whether a node with this id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Edges leaving the given node. Empty for unknown ids.
    pub fn outgoing(&self, id: &str) -> Vec<&Edge> {
        let Some(&index) = self.node_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| &self.edges[*edge.weight()])
            .collect()
    }

    /// Root-level nodes (no incoming edges), in first-encounter order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|node| {
            self.node_index
                .get(&node.id)
                .map(|&index| {
                    self.graph
                        .edges_directed(index, Direction::Incoming)
                        .next()
                        .is_none()
                })
                .unwrap_or(false)
        })
    }

    // =========================================================================
    // Traversals
    // =========================================================================

    /// All nodes reachable from `id` along outgoing edges, excluding `id`
    /// itself (even when a cycle leads back to it). Worklist traversal with
    /// a visited set, safe on cyclic graphs. Empty for unknown ids.
    pub fn descendants(&self, id: &str) -> HashSet<String> {
        let Some(&start) = self.node_index.get(id) else {
            return HashSet::new();
        };
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            for edge in self.graph.edges_directed(index, Direction::Outgoing) {
                stack.push(edge.target());
            }
        }
        visited.remove(&start);
        visited
            .into_iter()
            .filter_map(|index| self.graph.node_weight(index))
            .map(|&slot| self.nodes[slot].id.clone())
            .collect()
    }

    /// All edge ids on the downstream path from `id`: every outgoing edge
    /// of every node reachable from `id` (including `id`'s own). Each node
    /// is expanded at most once, so the traversal terminates on cycles.
    pub fn downstream_edges(&self, id: &str) -> HashSet<String> {
        let Some(&start) = self.node_index.get(id) else {
            return HashSet::new();
        };
        let mut reached: HashSet<String> = HashSet::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            for edge in self.graph.edges_directed(index, Direction::Outgoing) {
                reached.insert(self.edges[*edge.weight()].id.clone());
                stack.push(edge.target());
            }
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> LineageGraph {
        // A -> B -> D, A -> C -> D
        let mut graph = LineageGraph::new();
        for name in ["A", "B", "C", "D"] {
            graph.ensure_node(name, NodeKind::Table);
        }
        graph.insert_edge("A", "B");
        graph.insert_edge("A", "C");
        graph.insert_edge("B", "D");
        graph.insert_edge("C", "D");
        graph.recompute_outgoing();
        graph
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut graph = LineageGraph::new();
        graph.ensure_node("X", NodeKind::View);
        graph.ensure_node("X", NodeKind::Table);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("X").unwrap().kind, NodeKind::View);
    }

    #[test]
    fn test_duplicate_edges_not_reinserted() {
        let mut graph = diamond();
        assert!(!graph.insert_edge("A", "B"));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_edge_with_unknown_endpoint_rejected() {
        let mut graph = diamond();
        assert!(!graph.insert_edge("A", "NOPE"));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_has_outgoing_after_recompute() {
        let graph = diamond();
        assert!(graph.node("A").unwrap().has_outgoing);
        assert!(graph.node("B").unwrap().has_outgoing);
        assert!(!graph.node("D").unwrap().has_outgoing);
    }

    #[test]
    fn test_roots() {
        let graph = diamond();
        let roots: Vec<_> = graph.roots().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["A"]);
    }

    #[test]
    fn test_descendants_excludes_start() {
        let graph = diamond();
        let descendants = graph.descendants("A");
        assert_eq!(descendants.len(), 3);
        assert!(!descendants.contains("A"));
        assert!(descendants.contains("D"));
    }

    #[test]
    fn test_descendants_cycle_safe() {
        let mut graph = LineageGraph::new();
        graph.ensure_node("A", NodeKind::Table);
        graph.ensure_node("B", NodeKind::Table);
        graph.insert_edge("A", "B");
        graph.insert_edge("B", "A");
        graph.recompute_outgoing();

        // Terminates, and the start node is excluded even though the cycle
        // leads back to it.
        let descendants = graph.descendants("A");
        assert_eq!(descendants.len(), 1);
        assert!(descendants.contains("B"));
    }

    #[test]
    fn test_downstream_edges_cycle_safe() {
        let mut graph = LineageGraph::new();
        graph.ensure_node("A", NodeKind::Table);
        graph.ensure_node("B", NodeKind::Table);
        graph.insert_edge("A", "B");
        graph.insert_edge("B", "A");
        graph.recompute_outgoing();

        let reached = graph.downstream_edges("A");
        assert_eq!(reached.len(), 2);
        assert!(reached.contains("A->B"));
        assert!(reached.contains("B->A"));
    }

    #[test]
    fn test_downstream_edges_from_mid_graph() {
        let graph = diamond();
        let reached = graph.downstream_edges("B");
        assert_eq!(reached.len(), 1);
        assert!(reached.contains("B->D"));
    }

    #[test]
    fn test_unknown_id_lookups_are_empty() {
        let graph = diamond();
        assert!(graph.node("NOPE").is_none());
        assert!(graph.outgoing("NOPE").is_empty());
        assert!(graph.descendants("NOPE").is_empty());
        assert!(graph.downstream_edges("NOPE").is_empty());
    }
}
