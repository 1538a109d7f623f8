//! Visibility Engine: expand/collapse state and its propagation.
//!
//! Owns the three visibility sets (expanded nodes, hidden nodes, hidden
//! edges) as one explicit value with pure-ish transition methods; nothing
//! here lives in ambient state. The baseline after a build or reset is
//! every node expanded and nothing hidden, so the first toggle on a node
//! collapses it.
//!
//! Collapse is deep: a worklist traversal hides every node reachable along
//! outgoing edges (excluding the toggled node itself), and hides every
//! edge whose source is the toggled node or is itself hidden. Expand is
//! shallow: only direct children and their connecting edges are revealed,
//! so descendants hidden through a still-collapsed sibling path stay
//! hidden. This asymmetry is intentional.
//!
//! Multi-parent hiding is the OR simplification: a node is hidden once any
//! ancestor path collapses it, with no reference counting. Re-expanding
//! one ancestor does not re-show a node still hidden via another collapsed
//! ancestor unless that ancestor is also expanded. Tested explicitly in
//! `multi_parent_or_hiding` below.

use std::collections::HashSet;

use crate::graph::LineageGraph;

/// The expand/collapse state of one interactive session.
///
/// Mutated only through the toggle operations; [`VisibilityState::reset`]
/// is the only path back to the all-expanded baseline. All operations are
/// total: unknown node ids are no-ops, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    expanded: HashSet<String>,
    hidden_nodes: HashSet<String>,
    hidden_edges: HashSet<String>,
}

impl VisibilityState {
    /// The default view for a graph: all nodes expanded, nothing hidden.
    pub fn all_expanded(graph: &LineageGraph) -> Self {
        Self {
            expanded: graph.nodes().iter().map(|node| node.id.clone()).collect(),
            hidden_nodes: HashSet::new(),
            hidden_edges: HashSet::new(),
        }
    }

    /// Whether the node is currently marked expanded.
    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.expanded.contains(node_id)
    }

    /// Whether the node is currently hidden.
    pub fn is_node_hidden(&self, node_id: &str) -> bool {
        self.hidden_nodes.contains(node_id)
    }

    /// Whether the edge is currently hidden.
    pub fn is_edge_hidden(&self, edge_id: &str) -> bool {
        self.hidden_edges.contains(edge_id)
    }

    /// Number of hidden nodes.
    pub fn hidden_node_count(&self) -> usize {
        self.hidden_nodes.len()
    }

    /// Toggle one node: collapse if expanded, expand otherwise.
    /// Unknown ids are a no-op.
    pub fn toggle_node(&mut self, graph: &LineageGraph, node_id: &str) {
        if !graph.contains_node(node_id) {
            return;
        }
        if self.expanded.remove(node_id) {
            log::debug!("collapse {node_id}");
            self.collapse(graph, node_id);
        } else {
            log::debug!("expand {node_id}");
            self.expanded.insert(node_id.to_owned());
            self.expand(graph, node_id);
        }
    }

    /// Deep collapse: hide every descendant of `node_id` and cascade edge
    /// hiding along the collapsed subtree's outgoing edges.
    fn collapse(&mut self, graph: &LineageGraph, node_id: &str) {
        self.hidden_nodes.extend(graph.descendants(node_id));
        // An edge is hidden if its source is the collapsed node or its
        // source is hidden. Evaluated against the updated hidden set, so
        // the cascade covers the whole collapsed subtree in one pass.
        for edge in graph.edges() {
            if edge.source == node_id || self.hidden_nodes.contains(&edge.source) {
                self.hidden_edges.insert(edge.id.clone());
            }
        }
    }

    /// Shallow expand: reveal only the direct children of `node_id` and
    /// their connecting edges.
    fn expand(&mut self, graph: &LineageGraph, node_id: &str) {
        for edge in graph.outgoing(node_id) {
            self.hidden_nodes.remove(&edge.target);
            self.hidden_edges.remove(&edge.id);
        }
    }

    /// Global toggle. If any node is expanded, collapse everything: clear
    /// the expanded set and collapse from every root-level node.
    /// Otherwise mark every node expanded and reveal every node's direct
    /// children.
    pub fn toggle_all(&mut self, graph: &LineageGraph) {
        if !self.expanded.is_empty() {
            log::debug!("collapse all");
            self.expanded.clear();
            let roots: Vec<String> = graph.roots().map(|node| node.id.clone()).collect();
            for root in roots {
                self.collapse(graph, &root);
            }
        } else {
            log::debug!("expand all");
            for node in graph.nodes() {
                self.expanded.insert(node.id.clone());
            }
            let ids: Vec<String> = graph.nodes().iter().map(|node| node.id.clone()).collect();
            for id in ids {
                self.expand(graph, &id);
            }
        }
    }

    /// Return to the default view: all nodes expanded, everything visible.
    pub fn reset(&mut self, graph: &LineageGraph) {
        *self = Self::all_expanded(graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build, parse_records};

    fn graph_from(json: &str) -> LineageGraph {
        build(&parse_records(json).unwrap())
    }

    fn chain() -> LineageGraph {
        // T1 -> V1 -> R1
        graph_from(
            r#"[
            {"name":"T1","type":"TABLE","child":[{"name":"V1","type":"VIEW"}]},
            {"name":"V1","type":"VIEW","child":[{"name":"R1","type":"POWER BI REPORT"}]}
        ]"#,
        )
    }

    #[test]
    fn test_baseline_all_expanded() {
        let graph = chain();
        let state = VisibilityState::all_expanded(&graph);
        assert!(state.is_expanded("T1"));
        assert!(state.is_expanded("R1"));
        assert!(!state.is_node_hidden("V1"));
        assert!(!state.is_edge_hidden("T1->V1"));
    }

    #[test]
    fn test_toggle_collapses_then_reexpands() {
        let graph = chain();
        let mut state = VisibilityState::all_expanded(&graph);

        state.toggle_node(&graph, "T1");
        assert!(!state.is_expanded("T1"));
        assert!(state.is_node_hidden("V1"));
        assert!(state.is_node_hidden("R1"));
        assert!(state.is_edge_hidden("T1->V1"));
        assert!(state.is_edge_hidden("V1->R1"));

        state.toggle_node(&graph, "T1");
        assert!(state.is_expanded("T1"));
        // Shallow expand: the direct child comes back...
        assert!(!state.is_node_hidden("V1"));
        assert!(!state.is_edge_hidden("T1->V1"));
        // ...but the deeper descendant stays hidden until V1 is toggled.
        assert!(state.is_node_hidden("R1"));
        assert!(state.is_edge_hidden("V1->R1"));
    }

    #[test]
    fn test_deep_collapse_shallow_expand_asymmetry() {
        let graph = chain();
        let mut state = VisibilityState::all_expanded(&graph);

        state.toggle_node(&graph, "T1"); // collapse all of T1's subtree
        state.toggle_node(&graph, "T1"); // reveal V1 only
        assert!(state.is_node_hidden("R1"));

        // V1 was never removed from the expanded set, so toggling it now
        // collapses first; a second toggle reveals R1.
        state.toggle_node(&graph, "V1");
        state.toggle_node(&graph, "V1");
        assert!(!state.is_node_hidden("R1"));
        assert!(!state.is_edge_hidden("V1->R1"));
    }

    #[test]
    fn test_collapse_cycle_safe() {
        let graph = graph_from(
            r#"[
            {"name":"A","type":"TABLE","child":[{"name":"B","type":"VIEW"}]},
            {"name":"B","type":"VIEW","child":[{"name":"A","type":"TABLE"}]}
        ]"#,
        );
        let mut state = VisibilityState::all_expanded(&graph);

        state.toggle_node(&graph, "A");
        // Terminates; B hides, A itself does not (the toggled node is
        // excluded even though the cycle reaches back to it).
        assert!(state.is_node_hidden("B"));
        assert!(!state.is_node_hidden("A"));
        assert!(state.is_edge_hidden("A->B"));
        assert!(state.is_edge_hidden("B->A"));
    }

    #[test]
    fn multi_parent_or_hiding() {
        // A -> C and B -> C. Collapsing A hides C even though B remains
        // expanded: hidden-ness is OR'd across ancestors, no reference
        // counting.
        let graph = graph_from(
            r#"[
            {"name":"A","type":"TABLE","child":[{"name":"C","type":"VIEW"}]},
            {"name":"B","type":"TABLE","child":[{"name":"C","type":"VIEW"}]}
        ]"#,
        );
        let mut state = VisibilityState::all_expanded(&graph);

        state.toggle_node(&graph, "A");
        assert!(state.is_node_hidden("C"));
        assert!(state.is_expanded("B"));
        // Edge hiding keys off the source only: A->C hides, B->C
        // survives because B is still visible.
        assert!(state.is_edge_hidden("A->C"));
        assert!(!state.is_edge_hidden("B->C"));

        // Re-expanding B (still in the expanded set, so toggle twice)
        // re-shows C: the OR policy is escapable through any parent.
        state.toggle_node(&graph, "B");
        state.toggle_node(&graph, "B");
        assert!(!state.is_node_hidden("C"));
    }

    #[test]
    fn test_toggle_all_round_trip() {
        let graph = graph_from(
            r#"[{"name":"R","type":"TABLE","child":[{"name":"C","type":"VIEW"}]}]"#,
        );
        let mut state = VisibilityState::all_expanded(&graph);

        state.toggle_all(&graph);
        assert!(!state.is_expanded("R"));
        assert!(state.is_node_hidden("C"));
        assert!(state.is_edge_hidden("R->C"));

        state.toggle_all(&graph);
        assert!(state.is_expanded("R"));
        assert!(state.is_expanded("C"));
        assert!(!state.is_node_hidden("C"));
        assert!(!state.is_edge_hidden("R->C"));
    }

    #[test]
    fn test_toggle_all_deep_graph_fully_revealed() {
        let graph = chain();
        let mut state = VisibilityState::all_expanded(&graph);

        state.toggle_all(&graph);
        assert!(state.is_node_hidden("V1"));
        assert!(state.is_node_hidden("R1"));

        // Expand-all expands from every node, so even deep descendants
        // come back in one action.
        state.toggle_all(&graph);
        assert!(!state.is_node_hidden("V1"));
        assert!(!state.is_node_hidden("R1"));
        assert!(!state.is_edge_hidden("V1->R1"));
    }

    #[test]
    fn test_reset_idempotent() {
        let graph = chain();
        let mut state = VisibilityState::all_expanded(&graph);
        state.toggle_node(&graph, "T1");
        state.toggle_all(&graph);

        state.reset(&graph);
        let once = state.clone();
        state.reset(&graph);
        assert_eq!(state, once);
        assert_eq!(state, VisibilityState::all_expanded(&graph));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let graph = chain();
        let mut state = VisibilityState::all_expanded(&graph);
        let before = state.clone();
        state.toggle_node(&graph, "GHOST");
        assert_eq!(state, before);
    }
}
