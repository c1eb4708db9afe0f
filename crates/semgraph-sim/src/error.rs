//! Error types for similarity computation.

use thiserror::Error;

use semgraph_algo::AlgoError;
use semgraph_core::GraphError;

/// Errors produced by the semgraph-sim crate.
#[derive(Debug, Error)]
pub enum SimError {
    /// The selected measure identifier is not known.
    #[error("unknown similarity measure '{id}'")]
    UnknownMeasure { id: String },

    /// A distance lookup failed: the vertex is not connected to the
    /// most-specific ancestor's component.
    #[error("vertex {vertex} is unreachable from the most-specific ancestor")]
    Unreachable { vertex: String },

    /// An underlying engine failure (cycle, missing ancestor, root
    /// resolution).
    #[error(transparent)]
    Algo(#[from] AlgoError),

    /// An underlying graph-store failure.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
