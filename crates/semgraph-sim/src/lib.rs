//! Pairwise semantic similarity over taxonomic graphs.
//!
//! [`engine::SimilarityEngine`] resolves the most-specific common ancestor
//! of a vertex pair and its distances to the pair and the global root, then
//! hands the numbers to a pure [`measures::SimilarityMeasure`]. The engine
//! never mutates the graph; independent pairs can be scored concurrently.

pub mod engine;
pub mod error;
pub mod measures;

pub use engine::SimilarityEngine;
pub use error::SimError;
pub use measures::{MeasureConfig, MeasureKind, PairContext, SimilarityMeasure};
