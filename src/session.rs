//! LineageSession: one interactive exploration session.
//!
//! Owns the graph, the layout positions, and the visibility / search /
//! highlight state, and exposes the action surface the rendering
//! collaborator drives: toggle, global toggle, node click, search, match
//! navigation, reset, frame projection, and export. Every action mutates
//! synchronously and the next `frame()` reflects it — layout and
//! composition are one atomic step per load, never interleaved with stale
//! visibility flags.

use std::collections::HashMap;

use crate::graph::{self, LineageGraph, Record};
use crate::layout::{self, LayeredLayout, LayoutBackend, LayoutConfig};
use crate::search::{SearchConfig, SearchState};
use crate::view::{self, HighlightState, Position, RenderFrame};
use crate::visibility::VisibilityState;

/// File name the host should offer for the export snapshot.
pub const FLOW_EXPORT_FILENAME: &str = "flow.json";

/// One interactive session over a lineage graph.
pub struct LineageSession {
    graph: LineageGraph,
    positions: HashMap<String, Position>,
    visibility: VisibilityState,
    search: SearchState,
    highlight: HighlightState,
    layout_config: LayoutConfig,
    backend: Box<dyn LayoutBackend>,
}

impl LineageSession {
    /// Create an empty session with the built-in layered layout and
    /// default search behavior.
    pub fn new() -> Self {
        Self::with_search_config(SearchConfig::default())
    }

    /// Create an empty session with explicit search options.
    pub fn with_search_config(config: SearchConfig) -> Self {
        Self {
            graph: LineageGraph::new(),
            positions: HashMap::new(),
            visibility: VisibilityState::default(),
            search: SearchState::new(config),
            highlight: HighlightState::default(),
            layout_config: LayoutConfig::default(),
            backend: Box::new(LayeredLayout::new()),
        }
    }

    /// Swap in a different layout collaborator.
    pub fn with_backend(mut self, backend: Box<dyn LayoutBackend>) -> Self {
        self.backend = backend;
        self
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Parse a JSON array of records and rebuild the whole session state
    /// from it. On a parse error the prior graph, positions, and
    /// interaction state are left untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        match graph::parse_records(json) {
            Ok(records) => {
                self.load_records(&records);
                Ok(())
            }
            Err(error) => {
                log::warn!("rejected lineage input: {error}");
                Err(error)
            }
        }
    }

    /// Rebuild the session from already-parsed records: build the graph,
    /// lay it out, and return every interaction state to its baseline.
    pub fn load_records(&mut self, records: &[Record]) {
        self.graph = graph::build(records);
        self.positions = layout::compute_positions(
            &self.graph,
            self.backend.as_ref(),
            &self.layout_config,
            layout::label_extent,
        );
        self.visibility = VisibilityState::all_expanded(&self.graph);
        self.search.clear();
        self.highlight.clear();
        log::info!(
            "loaded lineage graph: {} nodes, {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
    }

    // =========================================================================
    // Actions (the rendering collaborator's intents)
    // =========================================================================

    /// Toggle one node between expanded and collapsed.
    pub fn toggle_node(&mut self, node_id: &str) {
        self.visibility.toggle_node(&self.graph, node_id);
    }

    /// Toggle between all-collapsed and all-expanded.
    pub fn toggle_all(&mut self) {
        self.visibility.toggle_all(&self.graph);
    }

    /// Highlight the downstream edge path from a clicked node, replacing
    /// any prior click highlight.
    pub fn node_clicked(&mut self, node_id: &str) {
        self.highlight.set_downstream(&self.graph, node_id);
    }

    /// Search node ids and return the match count.
    pub fn search(&mut self, query: &str) -> usize {
        self.search.search(&self.graph, query)
    }

    /// Step to the next search match; the first step after a fresh search
    /// lands on match 0. The returned id is the node to focus.
    pub fn advance_match(&mut self) -> Option<String> {
        self.search.advance().map(str::to_owned)
    }

    /// Return to the default view: everything expanded and visible, no
    /// search matches, no click highlight.
    pub fn reset(&mut self) {
        self.visibility.reset(&self.graph);
        self.search.clear();
        self.highlight.clear();
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// The graph, for read-only inspection.
    pub fn graph(&self) -> &LineageGraph {
        &self.graph
    }

    /// Compute the current renderable frame.
    pub fn frame(&self) -> RenderFrame {
        view::compose(
            &self.graph,
            &self.positions,
            &self.visibility,
            &self.search,
            &self.highlight,
        )
    }

    /// Serialize the current view (nodes with positions and flags, edges)
    /// as a JSON snapshot for the host to offer as a download named
    /// [`FLOW_EXPORT_FILENAME`].
    pub fn export_flow(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.frame())
    }
}

impl Default for LineageSession {
    fn default() -> Self {
        Self::new()
    }
}
