//! The similarity engine: resolves ancestors and distances for a vertex
//! pair and delegates scoring to the configured measure.

use semgraph_algo::closure::ClosureEngine;
use semgraph_core::{GraphStore, Iri, PredicateRegistry, VertexId};

use crate::error::SimError;
use crate::measures::{MeasureConfig, PairContext};

/// Read-only pairwise similarity engine.
///
/// Construction resolves the global root once; every query then needs one
/// most-specific-ancestor resolution and one shortest-path traversal rooted
/// at it. The engine never mutates the graph, so independent pairs may be
/// scored concurrently from the same instance.
pub struct SimilarityEngine<'a> {
    graph: &'a GraphStore,
    predicates: &'a PredicateRegistry,
    root: VertexId,
}

impl<'a> SimilarityEngine<'a> {
    /// Fails when the graph has no unique root (see
    /// [`ClosureEngine::resolve_root`]).
    pub fn new(graph: &'a GraphStore, predicates: &'a PredicateRegistry) -> Result<Self, SimError> {
        let root = ClosureEngine::new(graph, predicates).resolve_root()?;
        Ok(SimilarityEngine {
            graph,
            predicates,
            root,
        })
    }

    /// The resolved global root.
    pub fn root(&self) -> VertexId {
        self.root
    }

    /// Scores the pair (a, b) with the configured measure.
    ///
    /// The numeric range is measure-dependent; see the measure types in
    /// [`crate::measures`].
    pub fn similarity(
        &self,
        a: VertexId,
        b: VertexId,
        config: &MeasureConfig,
    ) -> Result<f64, SimError> {
        let context = self.pair_context(a, b)?;
        let score = config.kind.measure().score(&context);
        tracing::debug!(kind = %config.kind, score, "scored vertex pair");
        Ok(score)
    }

    /// Convenience: scores a pair addressed by IRI.
    pub fn similarity_between(
        &self,
        a: &Iri,
        b: &Iri,
        config: &MeasureConfig,
    ) -> Result<f64, SimError> {
        let a = self.graph.require_vertex(a)?;
        let b = self.graph.require_vertex(b)?;
        self.similarity(a, b, config)
    }

    /// Builds the distance-and-closure context handed to measures.
    ///
    /// One undirected traversal rooted at the most-specific ancestor covers
    /// the root (above it) and both query vertices (below it).
    fn pair_context(&self, a: VertexId, b: VertexId) -> Result<PairContext, SimError> {
        let engine = ClosureEngine::new(self.graph, self.predicates);
        let msa = engine.most_specific_ancestor(a, b)?;
        let paths = engine.distances_undirected(msa);

        let distance_to = |v: VertexId| -> Result<f64, SimError> {
            paths
                .get(&v)
                .map(|&d| d as f64)
                .ok_or_else(|| SimError::Unreachable {
                    vertex: self
                        .graph
                        .iri_of(v)
                        .map(|iri| iri.to_string())
                        .unwrap_or_else(|| format!("VertexId({})", v)),
                })
        };

        Ok(PairContext {
            d_msa_root: distance_to(self.root)?,
            d_msa_a: distance_to(a)?,
            d_msa_b: distance_to(b)?,
            msa_descendants: engine.descendants(msa)?.len(),
            taxonomy_size: self
                .graph
                .vertices(None)
                .into_iter()
                .filter(|&v| {
                    self.graph
                        .vertex_info(v)
                        .map(|info| info.kind.is_taxonomic())
                        .unwrap_or(false)
                })
                .count(),
        })
    }
}
