//! Layout: node positioning through a black-box layered layout backend.
//!
//! The engine hands the backend sized boxes and directed edge pairs and
//! gets box centers back; everything else (ranking, ordering, routing) is
//! the backend's business. The adapter corrects centers to the top-left
//! anchor the renderer expects and defaults missing positions to the
//! origin rather than failing the frame.

pub mod layered;

pub use layered::LayeredLayout;

use std::collections::HashMap;

use crate::graph::{LineageGraph, Node};
use crate::view::Position;

/// Layout configuration, in display units.
///
/// Fixed design constants of the lineage view, not user-configurable:
/// ranks advance left-to-right with 150 units between ranks, 100 units
/// between nodes within a rank, and 50 units reserved per edge channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Separation between nodes within the same rank.
    pub node_separation: f32,
    /// Separation reserved for edge channels threading through a rank.
    pub edge_separation: f32,
    /// Separation between adjacent ranks.
    pub rank_separation: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_separation: 100.0,
            edge_separation: 50.0,
            rank_separation: 150.0,
        }
    }
}

/// A node's intrinsic box, as handed to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// The narrow seam to the layout collaborator: sized boxes and directed
/// edge pairs in, box centers out. Backends place boxes without overlap;
/// they may omit nodes (the adapter tolerates it).
pub trait LayoutBackend {
    /// Compute box centers for the given boxes and edges.
    fn layout(
        &self,
        boxes: &[LayoutBox],
        edges: &[(String, String)],
        config: &LayoutConfig,
    ) -> HashMap<String, (f32, f32)>;
}

/// Fixed padding added to a label's text extent in each dimension.
const BOX_PADDING: f32 = 20.0;

/// Approximate a node label's rendered text extent plus the fixed box
/// padding. Stands in for a real text measurer when the host does not
/// supply one; the average advance approximates a 14px sans-serif face.
pub fn label_extent(node: &Node) -> (f32, f32) {
    const GLYPH_WIDTH: f32 = 8.0;
    const GLYPH_HEIGHT: f32 = 14.0;
    (
        node.id.chars().count() as f32 * GLYPH_WIDTH + BOX_PADDING,
        GLYPH_HEIGHT + BOX_PADDING,
    )
}

/// Run the backend over the whole graph and map its centers back onto
/// nodes as top-left positions.
///
/// `size_of` supplies each node's intrinsic box size; the backend needs
/// real extents to place boxes without overlap. Nodes absent from the
/// backend's result default to the origin.
pub fn compute_positions<S>(
    graph: &LineageGraph,
    backend: &dyn LayoutBackend,
    config: &LayoutConfig,
    size_of: S,
) -> HashMap<String, Position>
where
    S: Fn(&Node) -> (f32, f32),
{
    let boxes: Vec<LayoutBox> = graph
        .nodes()
        .iter()
        .map(|node| {
            let (width, height) = size_of(node);
            LayoutBox {
                id: node.id.clone(),
                width,
                height,
            }
        })
        .collect();
    let edges: Vec<(String, String)> = graph
        .edges()
        .iter()
        .map(|edge| (edge.source.clone(), edge.target.clone()))
        .collect();

    let centers = backend.layout(&boxes, &edges, config);

    boxes
        .iter()
        .map(|layout_box| {
            // Backends return box centers; the renderer anchors top-left.
            let position = centers
                .get(&layout_box.id)
                .map(|&(cx, cy)| Position {
                    x: cx - layout_box.width / 2.0,
                    y: cy - layout_box.height / 2.0,
                })
                .unwrap_or_default();
            (layout_box.id.clone(), position)
        })
        .collect()
}
