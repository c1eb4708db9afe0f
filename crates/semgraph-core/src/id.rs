//! Stable ID newtypes for graph entities.
//!
//! Both IDs are distinct newtype wrappers over `u32`, providing type safety
//! so that a `VertexId` cannot be accidentally used where an `EdgeId` is
//! expected. They bridge to petgraph's `NodeIndex<u32>` / `EdgeIndex<u32>`.

use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

/// Stable vertex identifier. Maps to a petgraph `NodeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Stable edge identifier. Maps to a petgraph `EdgeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

// Display implementations -- just print the inner value.

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridges to petgraph's index types.

impl From<NodeIndex<u32>> for VertexId {
    fn from(idx: NodeIndex<u32>) -> Self {
        VertexId(idx.index() as u32)
    }
}

impl From<VertexId> for NodeIndex<u32> {
    fn from(id: VertexId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

impl From<EdgeIndex<u32>> for EdgeId {
    fn from(idx: EdgeIndex<u32>) -> Self {
        EdgeId(idx.index() as u32)
    }
}

impl From<EdgeId> for EdgeIndex<u32> {
    fn from(id: EdgeId) -> Self {
        EdgeIndex::new(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_id_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let vertex_id = VertexId::from(idx);
        assert_eq!(vertex_id.0, 42);

        let back: NodeIndex<u32> = vertex_id.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn edge_id_to_edge_index_roundtrip() {
        let idx = EdgeIndex::<u32>::new(7);
        let edge_id = EdgeId::from(idx);
        assert_eq!(edge_id.0, 7);

        let back: EdgeIndex<u32> = edge_id.into();
        assert_eq!(back.index(), 7);
    }

    #[test]
    fn vertex_id_display() {
        assert_eq!(format!("{}", VertexId(7)), "7");
    }

    #[test]
    fn edge_id_display() {
        assert_eq!(format!("{}", EdgeId(99)), "99");
    }

    #[test]
    fn serde_roundtrip() {
        let vertex = VertexId(42);
        let json = serde_json::to_string(&vertex).unwrap();
        let back: VertexId = serde_json::from_str(&json).unwrap();
        assert_eq!(vertex, back);

        let edge = EdgeId(7);
        let json = serde_json::to_string(&edge).unwrap();
        let back: EdgeId = serde_json::from_str(&json).unwrap();
        assert_eq!(edge, back);
    }
}
