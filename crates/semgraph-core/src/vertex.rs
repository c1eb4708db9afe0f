//! Vertex payloads for the taxonomic graph.

use serde::{Deserialize, Serialize};

use crate::iri::Iri;

/// The role a vertex plays in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// A concept in the subsumption hierarchy.
    Class,
    /// An individual annotated with one or more classes via `rdf:type`.
    Instance,
    /// The top vertex of a rooted taxonomy.
    Root,
    /// A vertex fabricated by a graph transformation (e.g. an inverse
    /// predicate placeholder), not present in the source data.
    Synthetic,
}

impl VertexKind {
    /// Returns `true` for the kinds that participate in the subsumption
    /// hierarchy (classes and roots, synthetic or not).
    pub fn is_taxonomic(self) -> bool {
        !matches!(self, VertexKind::Instance)
    }
}

/// A vertex: an identifier plus its role tag.
///
/// Vertices are owned by [`crate::graph::GraphStore`] and addressed by
/// [`crate::id::VertexId`]; this struct is the petgraph node weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub iri: Iri,
    pub kind: VertexKind,
}

impl Vertex {
    pub fn new(iri: Iri, kind: VertexKind) -> Self {
        Vertex { iri, kind }
    }
}
