//! Generation-tagged closure cache.
//!
//! Closures are expensive to compute and cheap to reuse within a query
//! phase, but must never survive a graph mutation. [`ClosureCache`] records
//! the [`semgraph_core::GraphStore::generation`] its maps were computed at
//! and recomputes whenever the generation has advanced, so a stale map is
//! never returned.

use semgraph_core::{Direction, GraphStore, PredicateRegistry};

use crate::closure::{ClosureEngine, ClosureMap};
use crate::error::AlgoError;

/// Caches the per-direction closure maps of one graph.
#[derive(Debug, Default)]
pub struct ClosureCache {
    generation: Option<u64>,
    ancestors: Option<ClosureMap>,
    descendants: Option<ClosureMap>,
}

impl ClosureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The closure map for `dir`, recomputed if the graph has mutated since
    /// the cached copy was built.
    pub fn closures(
        &mut self,
        graph: &GraphStore,
        predicates: &PredicateRegistry,
        dir: Direction,
    ) -> Result<&ClosureMap, AlgoError> {
        if self.generation != Some(graph.generation()) {
            self.ancestors = None;
            self.descendants = None;
            self.generation = Some(graph.generation());
        }

        let slot = match dir {
            Direction::Out => &mut self.ancestors,
            Direction::In => &mut self.descendants,
        };
        if slot.is_none() {
            *slot = Some(ClosureEngine::new(graph, predicates).all_closures(dir)?);
        }
        match slot {
            Some(map) => Ok(map),
            None => unreachable!("slot filled above"),
        }
    }

    /// Drops all cached maps.
    pub fn invalidate(&mut self) {
        self.generation = None;
        self.ancestors = None;
        self.descendants = None;
    }

    /// The generation the cached maps belong to, if any are held.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semgraph_core::{vocab, Iri, VertexKind};

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn cache_recomputes_after_mutation() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(b, vocab::rdfs_subclassof(), a).unwrap();

        let mut cache = ClosureCache::new();
        let ancestors = cache.closures(&g, &registry, Direction::Out).unwrap();
        assert!(ancestors[&b].contains(&a));
        assert_eq!(cache.generation(), Some(g.generation()));

        // Mutate: add a grandparent. The cached map must not be served.
        let c = g
            .create_vertex(iri("http://example.org/ns#C"), VertexKind::Class)
            .unwrap();
        g.add_edge(a, vocab::rdfs_subclassof(), c).unwrap();

        let ancestors = cache.closures(&g, &registry, Direction::Out).unwrap();
        assert!(ancestors[&b].contains(&c));
    }

    #[test]
    fn both_directions_cached_independently() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(b, vocab::rdfs_subclassof(), a).unwrap();

        let mut cache = ClosureCache::new();
        assert!(cache.closures(&g, &registry, Direction::Out).unwrap()[&b].contains(&a));
        assert!(cache.closures(&g, &registry, Direction::In).unwrap()[&a].contains(&b));
    }

    #[test]
    fn invalidate_clears_generation() {
        let g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let mut cache = ClosureCache::new();
        cache.closures(&g, &registry, Direction::Out).unwrap();
        assert!(cache.generation().is_some());
        cache.invalidate();
        assert_eq!(cache.generation(), None);
    }
}
