//! External collaborator interfaces.
//!
//! Entailment and type inference are deliberately not implemented here --
//! the pipeline hands the work to injected implementations of these traits.
//! Calls are synchronous and opaque; retry/timeout policy belongs to the
//! implementation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use semgraph_core::{GraphStore, Iri};

/// A (subject, predicate, object) triple exchanged with a reasoner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Iri,
}

impl Statement {
    pub fn new(subject: Iri, predicate: Iri, object: Iri) -> Self {
        Statement {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// A failure reported by an external collaborator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CollabError(pub String);

/// Computes entailed statements from an edge snapshot.
///
/// The pipeline's `rdfs_inference` action snapshots the graph's edges,
/// calls [`Reasoner::infer`], and merges the returned statements back in.
/// Implementations own all entailment semantics.
pub trait Reasoner {
    fn infer(&self, statements: &[Statement]) -> Result<Vec<Statement>, CollabError>;
}

/// Assigns kinds to untyped vertices.
///
/// Returns `true` when every vertex could be typed. The pipeline's
/// `type_vertices` action decides, based on its strictness flag, whether an
/// incomplete result is fatal.
pub trait TypeInferencer {
    fn infer_types(&self, graph: &mut GraphStore) -> Result<bool, CollabError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_display() {
        let st = Statement::new(
            Iri::parse("http://example.org/ns#a").unwrap(),
            Iri::parse("http://example.org/ns#p").unwrap(),
            Iri::parse("http://example.org/ns#b").unwrap(),
        );
        assert_eq!(
            st.to_string(),
            "http://example.org/ns#a http://example.org/ns#p http://example.org/ns#b"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let st = Statement::new(
            Iri::parse("http://example.org/ns#a").unwrap(),
            Iri::parse("http://example.org/ns#p").unwrap(),
            Iri::parse("http://example.org/ns#b").unwrap(),
        );
        let json = serde_json::to_string(&st).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(st, back);
    }
}
