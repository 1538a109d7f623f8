//! Graph Builder: raw records to a deduplicated node/edge graph.
//!
//! Iterates records in input order. For each record, a node is ensured for
//! the record's own name, then for every `child` and `parent` entry, and a
//! directed edge is inserted per relation: `record -> child` for children,
//! `parent -> record` for parents. Names seen only inside a relation list
//! get a placeholder node carrying the kind stated by that reference, so
//! every edge endpoint always resolves to an existing node.

use super::engine::LineageGraph;
use super::record::Record;

/// Build the lineage graph from a flat record sequence.
///
/// Node and edge insertion order follows first-encounter order of the scan
/// (record, then its children, then its parents); this order governs
/// default rendering and search order downstream.
pub fn build(records: &[Record]) -> LineageGraph {
    let mut graph = LineageGraph::new();
    for record in records {
        graph.ensure_node(&record.name, record.kind);
        for child in &record.child {
            graph.ensure_node(&child.name, child.kind);
            graph.insert_edge(&record.name, &child.name);
        }
        for parent in &record.parent {
            graph.ensure_node(&parent.name, parent.kind);
            graph.insert_edge(&parent.name, &record.name);
        }
    }
    graph.recompute_outgoing();
    graph
}
