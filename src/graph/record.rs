//! Input record types.
//!
//! The sole input to the engine is a flat JSON array of records, each
//! describing one lineage entity and its direct parent/child relations.
//! Absent `child`/`parent` arrays default to empty; unrecognized or missing
//! `type` values fall back to [`NodeKind::Unknown`]; extra legacy fields
//! (`isStage`, `depdOrder`, `childNames`, `parentNames`) are ignored.

use serde::Deserialize;

use super::node::NodeKind;

/// A `{name, type}` reference inside a record's `child` or `parent` list.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationRef {
    /// Referenced node id.
    pub name: String,
    /// Referenced node kind.
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
}

/// One input record: a node plus its direct relations.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Unique node id.
    pub name: String,
    /// Node kind.
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    /// Downstream dependents (`record -> child` edges).
    #[serde(default)]
    pub child: Vec<RelationRef>,
    /// Upstream sources (`parent -> record` edges).
    #[serde(default)]
    pub parent: Vec<RelationRef>,
}

/// Parse a JSON array of records.
///
/// All-or-nothing: a malformed document yields an error and no records,
/// so callers can keep their prior graph intact.
pub fn parse_records(json: &str) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_str(json)
}
