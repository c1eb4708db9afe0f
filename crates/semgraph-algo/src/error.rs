//! Error types for the graph engines.
//!
//! Three fatal families: configuration problems (bad action options,
//! unresolvable identifiers), cycles where acyclicity is required, and
//! collaborator failures. Collaborator incompleteness is downgradable to a
//! warning only where an explicit leniency flag says so (see the pipeline).

use thiserror::Error;

use semgraph_core::GraphError;

use crate::collab::CollabError;

/// Errors produced by the semgraph-algo crate.
#[derive(Debug, Error)]
pub enum AlgoError {
    /// An action or engine was configured with missing or invalid options.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// A closure or reduction required an acyclic taxonomic relation and
    /// found a cycle.
    #[error("cycle detected in taxonomic graph: {unprocessed} vertex(es) on or below a cycle")]
    CycleDetected { unprocessed: usize },

    /// Two vertices share no ancestor; the graph is not rooted.
    #[error("no common ancestor for {a} and {b}; is the graph rooted?")]
    NoCommonAncestor { a: String, b: String },

    /// An external collaborator (reasoner, type inferencer) failed.
    #[error("collaborator failure: {reason}")]
    Collaborator { reason: String },

    /// An underlying graph-store failure.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl AlgoError {
    /// Shorthand for a configuration error with a formatted reason.
    pub fn config(reason: impl Into<String>) -> Self {
        AlgoError::Configuration {
            reason: reason.into(),
        }
    }
}

impl From<CollabError> for AlgoError {
    fn from(err: CollabError) -> Self {
        AlgoError::Collaborator {
            reason: err.to_string(),
        }
    }
}
