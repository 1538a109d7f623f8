//! Graph data model: records in, deduplicated nodes and edges out.

pub mod builder;
pub mod edge;
pub mod engine;
pub mod node;
pub mod record;

pub use builder::build;
pub use edge::{Edge, edge_id};
pub use engine::LineageGraph;
pub use node::{Node, NodeKind};
pub use record::{Record, RelationRef, parse_records};
