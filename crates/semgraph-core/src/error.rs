//! Core error types for semgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the graph data model.

use thiserror::Error;

use crate::id::{EdgeId, VertexId};
use crate::iri::Iri;

/// Errors produced by the semgraph-core crate.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An identifier string failed IRI validation.
    #[error("malformed IRI '{value}': {reason}")]
    MalformedIri { value: String, reason: &'static str },

    /// No vertex carries the given IRI.
    #[error("vertex not found: {iri}")]
    VertexNotFound { iri: Iri },

    /// A vertex ID does not refer to a live vertex.
    #[error("unknown vertex id: VertexId({id})", id = id.0)]
    UnknownVertexId { id: VertexId },

    /// An edge ID does not refer to a live edge.
    #[error("edge not found: EdgeId({id})", id = id.0)]
    EdgeNotFound { id: EdgeId },

    /// Attempting to create a vertex whose IRI is already taken.
    #[error("duplicate vertex: {iri}")]
    DuplicateVertex { iri: Iri },

    /// A predicate already has a different inverse declared.
    #[error("conflicting inverse for {predicate}: already {existing}, attempted {attempted}")]
    InverseConflict {
        predicate: Iri,
        existing: Iri,
        attempted: Iri,
    },
}
