//! Graph engines for taxonomic analysis: reachability closures, transitive
//! reduction, structural repair actions, and the pipeline sequencing them.
//!
//! The engines operate on [`semgraph_core::GraphStore`] in two strict
//! phases. Transformations take `&mut GraphStore` (single writer, enforced
//! by the borrow checker); queries borrow the store shared and may run
//! concurrently. [`cache::ClosureCache`] bridges the two by tagging derived
//! closures with the store's mutation generation.

pub mod actions;
pub mod cache;
pub mod closure;
pub mod collab;
pub mod error;
pub mod pipeline;
pub mod prune;
pub mod reduction;

pub use actions::{parse_actions, ActionSpec, GraphAction, ReductionTarget};
pub use cache::ClosureCache;
pub use closure::ClosureEngine;
pub use collab::{CollabError, Reasoner, Statement, TypeInferencer};
pub use error::AlgoError;
pub use pipeline::{apply_actions, apply_compiled, Collaborators};
pub use prune::PruneCriterion;
