//! Node type and the lineage entity kind.
//!
//! Nodes are the vertices in the lineage graph. Each node has:
//! - A globally unique string identifier (the record name)
//! - A kind (table, view, BI dataset/report) used by the renderer for
//!   color and icon selection
//! - A derived `has_outgoing` flag, true once any edge leaves the node

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of lineage entity a node represents.
///
/// Closed variant set with an explicit fallback: any type string the input
/// does not declare (or declares with an unrecognized value) maps to
/// `Unknown`, never to a guessed variant. Wire names match the upstream
/// catalog export (`"TABLE"`, `"POWER BI DATASET"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Table,
    View,
    PowerBiDataset,
    PowerBiReport,
    #[default]
    Unknown,
}

impl NodeKind {
    /// The wire name used in input records and render frames.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Table => "TABLE",
            NodeKind::View => "VIEW",
            NodeKind::PowerBiDataset => "POWER BI DATASET",
            NodeKind::PowerBiReport => "POWER BI REPORT",
            NodeKind::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        // Tolerate both the spaced wire form and underscore-normalized
        // variants seen across input revisions.
        match value.to_uppercase().replace('_', " ").as_str() {
            "TABLE" => NodeKind::Table,
            "VIEW" => NodeKind::View,
            "POWER BI DATASET" => NodeKind::PowerBiDataset,
            "POWER BI REPORT" => NodeKind::PowerBiReport,
            _ => NodeKind::Unknown,
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex in the lineage graph.
///
/// Created once per unique id during the graph build; the first occurrence
/// of a name wins for attached metadata. Nodes are never destroyed during
/// a session — display flags (expanded, hidden, highlighted) live in the
/// visibility and search state and are projected per frame, not stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Unique identifier (the record name).
    pub id: String,
    /// Entity kind, carried through for the renderer.
    pub kind: NodeKind,
    /// True if any edge has this node as its source. Computed only after
    /// the full build, since a node can gain outgoing edges from being
    /// another record's parent.
    pub has_outgoing: bool,
}

impl Node {
    /// Create a new node with no outgoing edges yet.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            has_outgoing: false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_wire_names() {
        assert_eq!(NodeKind::from("TABLE".to_owned()), NodeKind::Table);
        assert_eq!(NodeKind::from("VIEW".to_owned()), NodeKind::View);
        assert_eq!(
            NodeKind::from("POWER BI DATASET".to_owned()),
            NodeKind::PowerBiDataset
        );
        assert_eq!(
            NodeKind::from("POWER_BI_REPORT".to_owned()),
            NodeKind::PowerBiReport
        );
    }

    #[test]
    fn test_unknown_kind_fallback() {
        assert_eq!(
            NodeKind::from("MATERIALIZED LLAMA".to_owned()),
            NodeKind::Unknown
        );
        assert_eq!(NodeKind::from(String::new()), NodeKind::Unknown);
        assert_eq!(NodeKind::default(), NodeKind::Unknown);
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            NodeKind::Table,
            NodeKind::View,
            NodeKind::PowerBiDataset,
            NodeKind::PowerBiReport,
            NodeKind::Unknown,
        ] {
            assert_eq!(NodeKind::from(String::from(kind)), kind);
        }
    }

    #[test]
    fn test_node_display() {
        let node = Node::new("SALES_FACT", NodeKind::Table);
        assert_eq!(format!("{}", node), "SALES_FACT (TABLE)");
        assert!(!node.has_outgoing);
    }
}
