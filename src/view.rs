//! View Composer: merge graph, layout, visibility, and highlight state
//! into the renderable frame.
//!
//! `compose` is a pure projection — it never mutates the graph or any of
//! the state pieces and produces a fresh frame each call, suitable for a
//! declarative rendering surface that re-renders on reference change. It
//! runs after every state mutation; layout and composition together form
//! one atomic step per user action, so the renderer never sees new nodes
//! with stale visibility flags.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::graph::{LineageGraph, NodeKind};
use crate::search::SearchState;
use crate::visibility::VisibilityState;

/// A top-left-anchored node position in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Click-driven downstream edge highlight.
///
/// Clicking a node highlights every edge on the downstream path from it;
/// each click replaces the previous set, so only one click-highlight is
/// active at a time. Search highlighting (nodes) is independent of this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    edges: HashSet<String>,
}

impl HighlightState {
    /// Replace the highlight set with the downstream path from `node_id`.
    /// Unknown ids clear the set (the traversal reaches nothing).
    pub fn set_downstream(&mut self, graph: &LineageGraph, node_id: &str) {
        self.edges = graph.downstream_edges(node_id);
    }

    /// Whether an edge is on the highlighted path.
    pub fn contains(&self, edge_id: &str) -> bool {
        self.edges.contains(edge_id)
    }

    /// Drop the highlight.
    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

/// Renderer-facing node payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNodeData {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub expanded: bool,
    pub highlighted: bool,
    pub has_dependencies: bool,
}

/// One renderable node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: String,
    pub position: Position,
    pub hidden: bool,
    pub data: RenderNodeData,
}

/// Renderer-facing edge payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderEdgeData {
    pub highlight: bool,
}

/// One renderable edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub hidden: bool,
    pub data: RenderEdgeData,
}

/// The full renderable frame, in graph insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderFrame {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// Project the current state into a renderable frame.
///
/// Nodes missing from the position map (a degenerate layout result)
/// default to the origin rather than failing the frame.
pub fn compose(
    graph: &LineageGraph,
    positions: &HashMap<String, Position>,
    visibility: &VisibilityState,
    search: &SearchState,
    highlight: &HighlightState,
) -> RenderFrame {
    let nodes = graph
        .nodes()
        .iter()
        .map(|node| RenderNode {
            id: node.id.clone(),
            position: positions.get(&node.id).copied().unwrap_or_default(),
            hidden: visibility.is_node_hidden(&node.id),
            data: RenderNodeData {
                label: node.id.clone(),
                kind: node.kind,
                expanded: visibility.is_expanded(&node.id),
                highlighted: search.is_match(&node.id),
                has_dependencies: node.has_outgoing,
            },
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| RenderEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            hidden: visibility.is_edge_hidden(&edge.id),
            data: RenderEdgeData {
                highlight: highlight.contains(&edge.id),
            },
        })
        .collect();

    RenderFrame { nodes, edges }
}
