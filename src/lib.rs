//! Lineage Graph - WASM Module
//!
//! Interactive visibility and exploration engine for data lineage graphs
//! (tables, views, BI datasets and reports). The core transforms raw JSON
//! records into a deduplicated node/edge graph, positions it with a
//! layered layout, and tracks expand/collapse, search navigation, and
//! click-highlight state; a `wasm-bindgen` facade exposes the session to
//! a JavaScript rendering surface that owns icons, shapes, and the DOM.
//!
//! # Architecture
//!
//! - `graph`: records → deduplicated nodes and directed edges (petgraph)
//! - `layout`: layered layout backend behind a narrow collaborator seam
//! - `visibility`: expand/collapse propagation over the edge set
//! - `search`: substring matching with a wrapping match cursor
//! - `view`: pure projection of all state into the renderable frame
//! - `session`: one interactive session tying the pieces together

use wasm_bindgen::prelude::*;

pub mod graph;
pub mod layout;
pub mod search;
pub mod session;
pub mod view;
pub mod visibility;

use search::SearchConfig;
use session::{FLOW_EXPORT_FILENAME, LineageSession};

/// Initialize the WASM module: console logging and panic reporting.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Info);
    console_error_panic_hook::set_once();
}

/// Main entry point for the lineage engine.
///
/// Wraps the internal session and provides the public API exposed to
/// JavaScript: load, the interaction intents, frame projection, and
/// export.
#[wasm_bindgen]
pub struct LineageGraphWasm {
    session: LineageSession,
}

#[wasm_bindgen]
impl LineageGraphWasm {
    /// Create a new empty engine with default (case-sensitive) search.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: LineageSession::new(),
        }
    }

    /// Create an engine whose search ignores case.
    #[wasm_bindgen(js_name = withCaseInsensitiveSearch)]
    pub fn with_case_insensitive_search() -> Self {
        Self {
            session: LineageSession::with_search_config(SearchConfig {
                case_sensitive: false,
            }),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a JSON array of lineage records, replacing the whole session.
    ///
    /// Rejects malformed JSON with an error and leaves the prior graph
    /// untouched, so the host can keep showing the last valid view.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.session
            .load_json(json)
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    /// Number of nodes in the current graph.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.session.graph().node_count() as u32
    }

    /// Number of edges in the current graph.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.session.graph().edge_count() as u32
    }

    // =========================================================================
    // Interaction intents
    // =========================================================================

    /// Toggle one node between expanded and collapsed. Unknown ids are a
    /// no-op.
    #[wasm_bindgen(js_name = toggleNode)]
    pub fn toggle_node(&mut self, node_id: &str) {
        self.session.toggle_node(node_id);
    }

    /// Toggle between all-collapsed and all-expanded.
    #[wasm_bindgen(js_name = toggleAll)]
    pub fn toggle_all(&mut self) {
        self.session.toggle_all();
    }

    /// Highlight the downstream edge path from a clicked node.
    #[wasm_bindgen(js_name = nodeClicked)]
    pub fn node_clicked(&mut self, node_id: &str) {
        self.session.node_clicked(node_id);
    }

    /// Search node ids for a substring; returns the match count. All
    /// matches highlight in the next frame.
    pub fn search(&mut self, query: &str) -> u32 {
        self.session.search(query) as u32
    }

    /// Step to the next search match and return its node id (the node to
    /// focus), or undefined when there are no matches. The first step
    /// after a fresh search lands on match 0.
    #[wasm_bindgen(js_name = advanceMatch)]
    pub fn advance_match(&mut self) -> Option<String> {
        self.session.advance_match()
    }

    /// Return to the default view: everything expanded and visible.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    // =========================================================================
    // Projection and export
    // =========================================================================

    /// Compute the current renderable frame as a plain JS object:
    /// `{ nodes: [{id, position, hidden, data}], edges: [...] }`.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.frame()).map_err(JsValue::from)
    }

    /// Serialize the current view as a JSON snapshot for download.
    #[wasm_bindgen(js_name = exportFlow)]
    pub fn export_flow(&self) -> Result<String, JsValue> {
        self.session
            .export_flow()
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    /// The file name the snapshot should be saved under.
    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        FLOW_EXPORT_FILENAME.to_owned()
    }
}

impl Default for LineageGraphWasm {
    fn default() -> Self {
        Self::new()
    }
}
