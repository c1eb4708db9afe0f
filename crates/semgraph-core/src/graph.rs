//! GraphStore: the mutable taxonomic graph container.
//!
//! [`GraphStore`] is the single owner of vertices and edges. It wraps a
//! petgraph `StableGraph` (indices survive removals, so [`VertexId`]s held
//! by engines stay valid) plus an IRI index for identifier lookup.
//!
//! Mutation is explicit and versioned: every structural change advances the
//! mutation generation returned by [`GraphStore::generation`]. Derived
//! structures (closure caches, shortest-path maps) record the generation
//! they were computed at and must be discarded when it advances.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::GraphError;
use crate::id::{EdgeId, VertexId};
use crate::iri::Iri;
use crate::predicate::PredicateRegistry;
use crate::vertex::{Vertex, VertexKind};
use crate::vocab;

/// Traversal direction over subsumption edges.
///
/// Subsumption edges point from the more specific vertex to the more general
/// one, so `Out` walks toward ancestors and `In` toward descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow edges source-to-target (toward ancestors).
    Out,
    /// Follow edges target-to-source (toward descendants).
    In,
}

impl Direction {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
        }
    }

    fn petgraph(self) -> petgraph::Direction {
        match self {
            Direction::Out => petgraph::Direction::Outgoing,
            Direction::In => petgraph::Direction::Incoming,
        }
    }
}

/// The mutable graph container.
///
/// All structure lives here: engines borrow the store (shared for queries,
/// exclusive for transformations) and never own graph state themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStore {
    graph: StableGraph<Vertex, Iri, Directed, u32>,
    index: HashMap<Iri, VertexId>,
    generation: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            graph: StableGraph::new(),
            index: HashMap::new(),
            generation: 0,
        }
    }

    /// The current mutation generation. Advances on every structural change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    /// Validates an identifier string into an [`Iri`].
    ///
    /// Fails with [`GraphError::MalformedIri`] on malformed input; does not
    /// require the vertex to exist.
    pub fn resolve(&self, identifier: &str) -> Result<Iri, GraphError> {
        Iri::parse(identifier)
    }

    // -----------------------------------------------------------------------
    // Vertex methods
    // -----------------------------------------------------------------------

    /// Creates a vertex. Fails with [`GraphError::DuplicateVertex`] when the
    /// IRI is already taken.
    pub fn create_vertex(&mut self, iri: Iri, kind: VertexKind) -> Result<VertexId, GraphError> {
        if self.index.contains_key(&iri) {
            return Err(GraphError::DuplicateVertex { iri });
        }
        let idx = self.graph.add_node(Vertex::new(iri.clone(), kind));
        let id = VertexId::from(idx);
        self.index.insert(iri, id);
        self.bump();
        Ok(id)
    }

    /// Returns the existing vertex for `iri`, or creates it with `kind`.
    pub fn get_or_create_vertex(&mut self, iri: Iri, kind: VertexKind) -> VertexId {
        if let Some(&id) = self.index.get(&iri) {
            return id;
        }
        let idx = self.graph.add_node(Vertex::new(iri.clone(), kind));
        let id = VertexId::from(idx);
        self.index.insert(iri, id);
        self.bump();
        id
    }

    /// Looks up a vertex by IRI.
    pub fn vertex(&self, iri: &Iri) -> Option<VertexId> {
        self.index.get(iri).copied()
    }

    /// Looks up a vertex by IRI, failing with [`GraphError::VertexNotFound`]
    /// when absent.
    pub fn require_vertex(&self, iri: &Iri) -> Result<VertexId, GraphError> {
        self.vertex(iri)
            .ok_or_else(|| GraphError::VertexNotFound { iri: iri.clone() })
    }

    /// The payload of a vertex, or `None` for a stale ID.
    pub fn vertex_info(&self, id: VertexId) -> Option<&Vertex> {
        self.graph.node_weight(id.into())
    }

    /// The IRI of a vertex, or `None` for a stale ID.
    pub fn iri_of(&self, id: VertexId) -> Option<&Iri> {
        self.vertex_info(id).map(|v| &v.iri)
    }

    /// All live vertex IDs, optionally restricted to one kind, in stable
    /// insertion order.
    pub fn vertices(&self, kind: Option<VertexKind>) -> Vec<VertexId> {
        self.graph
            .node_indices()
            .filter(|&idx| match kind {
                Some(k) => self.graph[idx].kind == k,
                None => true,
            })
            .map(VertexId::from)
            .collect()
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of live vertices of one kind.
    pub fn vertex_count_of(&self, kind: VertexKind) -> usize {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind == kind)
            .count()
    }

    /// Removes the given vertices and all their incident edges. Stale IDs
    /// are skipped. Returns the number of vertices actually removed.
    pub fn remove_vertices<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = VertexId>,
    {
        let mut removed = 0;
        for id in ids {
            let idx: NodeIndex<u32> = id.into();
            if let Some(vertex) = self.graph.remove_node(idx) {
                self.index.remove(&vertex.iri);
                removed += 1;
            }
        }
        if removed > 0 {
            self.bump();
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Edge methods
    // -----------------------------------------------------------------------

    /// Adds an edge labeled with `predicate`. Both endpoints must exist.
    pub fn add_edge(
        &mut self,
        source: VertexId,
        predicate: Iri,
        target: VertexId,
    ) -> Result<EdgeId, GraphError> {
        for id in [source, target] {
            let idx: NodeIndex<u32> = id.into();
            if self.graph.node_weight(idx).is_none() {
                return Err(GraphError::UnknownVertexId { id });
            }
        }
        let idx = self.graph.add_edge(source.into(), target.into(), predicate);
        self.bump();
        Ok(EdgeId::from(idx))
    }

    /// Whether an edge (source, predicate, target) exists.
    pub fn has_edge(&self, source: VertexId, predicate: &Iri, target: VertexId) -> bool {
        let source_idx: NodeIndex<u32> = source.into();
        let target_idx: NodeIndex<u32> = target.into();
        self.graph
            .edges_directed(source_idx, petgraph::Direction::Outgoing)
            .any(|e| e.target() == target_idx && e.weight() == predicate)
    }

    /// The (source, predicate, target) triple of an edge, or `None` for a
    /// stale ID.
    pub fn edge(&self, id: EdgeId) -> Option<(VertexId, &Iri, VertexId)> {
        let idx: EdgeIndex<u32> = id.into();
        let (source, target) = self.graph.edge_endpoints(idx)?;
        let predicate = self.graph.edge_weight(idx)?;
        Some((VertexId::from(source), predicate, VertexId::from(target)))
    }

    /// All live edge IDs, optionally restricted to one predicate.
    pub fn edges(&self, predicate: Option<&Iri>) -> Vec<EdgeId> {
        self.graph
            .edge_indices()
            .filter(|&idx| match predicate {
                Some(p) => self.graph.edge_weight(idx) == Some(p),
                None => true,
            })
            .map(EdgeId::from)
            .collect()
    }

    /// Iterates all edges as (source, predicate, target) triples.
    pub fn edge_triples(&self) -> impl Iterator<Item = (VertexId, &Iri, VertexId)> {
        self.graph.edge_references().map(|e| {
            (
                VertexId::from(e.source()),
                e.weight(),
                VertexId::from(e.target()),
            )
        })
    }

    /// Edges incident to `v` in `dir`, with the far endpoint.
    pub fn edges_of(&self, v: VertexId, dir: Direction) -> Vec<(EdgeId, VertexId)> {
        let idx: NodeIndex<u32> = v.into();
        self.graph
            .edges_directed(idx, dir.petgraph())
            .map(|e| {
                let far = match dir {
                    Direction::Out => e.target(),
                    Direction::In => e.source(),
                };
                (EdgeId::from(e.id()), VertexId::from(far))
            })
            .collect()
    }

    /// Edges incident to `v` in `dir` carrying `predicate`, with the far
    /// endpoint.
    pub fn edges_with(
        &self,
        v: VertexId,
        dir: Direction,
        predicate: &Iri,
    ) -> Vec<(EdgeId, VertexId)> {
        let idx: NodeIndex<u32> = v.into();
        self.graph
            .edges_directed(idx, dir.petgraph())
            .filter(|e| e.weight() == predicate)
            .map(|e| {
                let far = match dir {
                    Direction::Out => e.target(),
                    Direction::In => e.source(),
                };
                (EdgeId::from(e.id()), VertexId::from(far))
            })
            .collect()
    }

    /// The outgoing `rdf:type` edges of a vertex, with the class endpoint.
    pub fn type_edges(&self, v: VertexId) -> Vec<(EdgeId, VertexId)> {
        self.edges_with(v, Direction::Out, &vocab::rdf_type())
    }

    /// Neighbors of `v` across taxonomic edges in `dir`.
    ///
    /// Most vertices have a handful of direct parents, hence the inline
    /// buffer.
    pub fn taxonomic_neighbors(
        &self,
        v: VertexId,
        dir: Direction,
        predicates: &PredicateRegistry,
    ) -> SmallVec<[VertexId; 4]> {
        let idx: NodeIndex<u32> = v.into();
        self.graph
            .edges_directed(idx, dir.petgraph())
            .filter(|e| predicates.is_taxonomic(e.weight()))
            .map(|e| {
                let far = match dir {
                    Direction::Out => e.target(),
                    Direction::In => e.source(),
                };
                VertexId::from(far)
            })
            .collect()
    }

    /// Taxonomic edges incident to `v` in `dir`, with the far endpoint.
    pub fn taxonomic_edges_of(
        &self,
        v: VertexId,
        dir: Direction,
        predicates: &PredicateRegistry,
    ) -> Vec<(EdgeId, VertexId)> {
        let idx: NodeIndex<u32> = v.into();
        self.graph
            .edges_directed(idx, dir.petgraph())
            .filter(|e| predicates.is_taxonomic(e.weight()))
            .map(|e| {
                let far = match dir {
                    Direction::Out => e.target(),
                    Direction::In => e.source(),
                };
                (EdgeId::from(e.id()), VertexId::from(far))
            })
            .collect()
    }

    /// Removes the given edges. Stale IDs are skipped. Returns the number of
    /// edges actually removed.
    pub fn remove_edges<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = EdgeId>,
    {
        let mut removed = 0;
        for id in ids {
            let idx: EdgeIndex<u32> = id.into();
            if self.graph.remove_edge(idx).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            self.bump();
        }
        removed
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn sub() -> Iri {
        vocab::rdfs_subclassof()
    }

    #[test]
    fn create_and_lookup_vertex() {
        let mut g = GraphStore::new();
        let thing = iri("http://example.org/ns#Thing");
        let id = g.create_vertex(thing.clone(), VertexKind::Class).unwrap();

        assert_eq!(g.vertex(&thing), Some(id));
        assert_eq!(g.vertex_info(id).unwrap().kind, VertexKind::Class);
        assert_eq!(g.iri_of(id), Some(&thing));
        assert_eq!(g.vertex_count(), 1);
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let mut g = GraphStore::new();
        let thing = iri("http://example.org/ns#Thing");
        g.create_vertex(thing.clone(), VertexKind::Class).unwrap();
        assert!(matches!(
            g.create_vertex(thing, VertexKind::Instance),
            Err(GraphError::DuplicateVertex { .. })
        ));
    }

    #[test]
    fn get_or_create_returns_existing() {
        let mut g = GraphStore::new();
        let thing = iri("http://example.org/ns#Thing");
        let id = g.create_vertex(thing.clone(), VertexKind::Class).unwrap();
        let gen = g.generation();
        assert_eq!(g.get_or_create_vertex(thing, VertexKind::Class), id);
        assert_eq!(g.generation(), gen);
    }

    #[test]
    fn require_vertex_errors_on_missing() {
        let g = GraphStore::new();
        assert!(matches!(
            g.require_vertex(&iri("http://example.org/ns#Nope")),
            Err(GraphError::VertexNotFound { .. })
        ));
    }

    #[test]
    fn add_edge_validates_endpoints() {
        let mut g = GraphStore::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let result = g.add_edge(a, sub(), VertexId(99));
        assert!(matches!(result, Err(GraphError::UnknownVertexId { .. })));
    }

    #[test]
    fn edges_of_by_direction() {
        let mut g = GraphStore::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(a, sub(), b).unwrap();

        let out = g.edges_of(a, Direction::Out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1, b);

        let incoming = g.edges_of(b, Direction::In);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].1, a);

        assert!(g.edges_of(a, Direction::In).is_empty());
    }

    #[test]
    fn has_edge_checks_predicate() {
        let mut g = GraphStore::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(a, sub(), b).unwrap();

        assert!(g.has_edge(a, &sub(), b));
        assert!(!g.has_edge(b, &sub(), a));
        assert!(!g.has_edge(a, &vocab::rdf_type(), b));
    }

    #[test]
    fn taxonomic_neighbors_filter_predicates() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let inst = g
            .create_vertex(iri("http://example.org/ns#i"), VertexKind::Instance)
            .unwrap();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(a, sub(), b).unwrap();
        g.add_edge(inst, vocab::rdf_type(), a).unwrap();

        // rdf:type is not taxonomic, so `a` has exactly one taxonomic
        // neighbor in each direction arrangement.
        assert_eq!(
            g.taxonomic_neighbors(a, Direction::Out, &registry).to_vec(),
            vec![b]
        );
        assert!(g
            .taxonomic_neighbors(a, Direction::In, &registry)
            .is_empty());
        assert!(g
            .taxonomic_neighbors(inst, Direction::Out, &registry)
            .is_empty());
    }

    #[test]
    fn type_edges_of_instance() {
        let mut g = GraphStore::new();
        let inst = g
            .create_vertex(iri("http://example.org/ns#i"), VertexKind::Instance)
            .unwrap();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        g.add_edge(inst, vocab::rdf_type(), a).unwrap();

        let typed = g.type_edges(inst);
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].1, a);
    }

    #[test]
    fn remove_vertices_drops_incident_edges_and_index() {
        let mut g = GraphStore::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(a, sub(), b).unwrap();

        assert_eq!(g.remove_vertices([b]), 1);
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.vertex(&iri("http://example.org/ns#B")), None);

        // Stale removal is a no-op.
        assert_eq!(g.remove_vertices([b]), 0);
    }

    #[test]
    fn removal_keeps_other_ids_stable() {
        let mut g = GraphStore::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        let c = g
            .create_vertex(iri("http://example.org/ns#C"), VertexKind::Class)
            .unwrap();
        g.remove_vertices([b]);

        assert_eq!(g.iri_of(a).unwrap().as_str(), "http://example.org/ns#A");
        assert_eq!(g.iri_of(c).unwrap().as_str(), "http://example.org/ns#C");
    }

    #[test]
    fn generation_advances_on_mutation_only() {
        let mut g = GraphStore::new();
        let gen0 = g.generation();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        assert!(g.generation() > gen0);

        let gen1 = g.generation();
        let e = g.add_edge(a, sub(), b).unwrap();
        assert!(g.generation() > gen1);

        let gen2 = g.generation();
        g.vertices(None);
        g.edges_of(a, Direction::Out);
        assert_eq!(g.generation(), gen2);

        g.remove_edges([e]);
        assert!(g.generation() > gen2);
    }

    #[test]
    fn vertices_filter_by_kind() {
        let mut g = GraphStore::new();
        g.create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        g.create_vertex(iri("http://example.org/ns#i"), VertexKind::Instance)
            .unwrap();

        assert_eq!(g.vertices(None).len(), 2);
        assert_eq!(g.vertices(Some(VertexKind::Class)).len(), 1);
        assert_eq!(g.vertex_count_of(VertexKind::Instance), 1);
    }

    #[test]
    fn serde_roundtrip_preserves_structure() {
        let mut g = GraphStore::new();
        let a = g
            .create_vertex(iri("http://example.org/ns#A"), VertexKind::Class)
            .unwrap();
        let b = g
            .create_vertex(iri("http://example.org/ns#B"), VertexKind::Class)
            .unwrap();
        g.add_edge(a, sub(), b).unwrap();

        let json = serde_json::to_string(&g).unwrap();
        let back: GraphStore = serde_json::from_str(&json).unwrap();

        assert_eq!(back.vertex_count(), g.vertex_count());
        assert_eq!(back.edge_count(), g.edge_count());
        let a2 = back.vertex(&iri("http://example.org/ns#A")).unwrap();
        let b2 = back.vertex(&iri("http://example.org/ns#B")).unwrap();
        assert!(back.has_edge(a2, &sub(), b2));
        assert_eq!(back.generation(), g.generation());
    }
}
