//! Reachability closures, most-specific common ancestors, and shortest-path
//! maps over the taxonomic relation.
//!
//! All traversals are restricted to edges whose predicate is registered as
//! taxonomic. The engine borrows the graph shared, so the borrow checker
//! guarantees nothing mutates underneath a query phase; results for
//! independent vertices or pairs may be computed concurrently.

use std::collections::{HashMap, HashSet, VecDeque};

use semgraph_core::{Direction, GraphStore, PredicateRegistry, VertexId, VertexKind};

use crate::error::AlgoError;

/// Per-vertex exclusive reachable sets for one traversal direction.
pub type ClosureMap = HashMap<VertexId, HashSet<VertexId>>;

/// Edge-count distances from a reference vertex.
pub type DistanceMap = HashMap<VertexId, u64>;

/// Read-only reachability engine over the taxonomic subgraph.
pub struct ClosureEngine<'a> {
    graph: &'a GraphStore,
    predicates: &'a PredicateRegistry,
}

impl<'a> ClosureEngine<'a> {
    pub fn new(graph: &'a GraphStore, predicates: &'a PredicateRegistry) -> Self {
        ClosureEngine { graph, predicates }
    }

    /// The exclusive set of vertices reachable from `v` along taxonomic
    /// edges in `dir`. Empty when `v` has no edge in that direction.
    ///
    /// A cycle through `v` itself is reported as [`AlgoError::CycleDetected`];
    /// the full acyclicity check over the whole relation is performed by
    /// [`ClosureEngine::all_closures`].
    pub fn closure(&self, v: VertexId, dir: Direction) -> Result<HashSet<VertexId>, AlgoError> {
        let mut reached: HashSet<VertexId> = HashSet::new();
        let mut queue = VecDeque::from([v]);
        while let Some(u) = queue.pop_front() {
            for n in self.graph.taxonomic_neighbors(u, dir, self.predicates) {
                if n == v {
                    return Err(AlgoError::CycleDetected { unprocessed: 1 });
                }
                if reached.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        Ok(reached)
    }

    /// Exclusive ancestors of `v`.
    pub fn ancestors(&self, v: VertexId) -> Result<HashSet<VertexId>, AlgoError> {
        self.closure(v, Direction::Out)
    }

    /// Exclusive descendants of `v`.
    pub fn descendants(&self, v: VertexId) -> Result<HashSet<VertexId>, AlgoError> {
        self.closure(v, Direction::In)
    }

    /// Closures for every vertex, computed in one pass.
    ///
    /// Vertices are processed so that all traversal-direction neighbors of a
    /// vertex are finished before the vertex itself (Kahn-style counting over
    /// taxonomic edges); a vertex's closure is then the union of its direct
    /// neighbors and their closures. Runs in time linear in vertices, edges
    /// and emitted closure sizes.
    ///
    /// Fails with [`AlgoError::CycleDetected`] when no such processing order
    /// exists, reporting how many vertices could not be ordered.
    pub fn all_closures(&self, dir: Direction) -> Result<ClosureMap, AlgoError> {
        let vertices = self.graph.vertices(None);
        let mut pending: HashMap<VertexId, usize> = HashMap::with_capacity(vertices.len());
        let mut queue: VecDeque<VertexId> = VecDeque::new();

        for &v in &vertices {
            let degree = self.graph.taxonomic_neighbors(v, dir, self.predicates).len();
            pending.insert(v, degree);
            if degree == 0 {
                queue.push_back(v);
            }
        }

        let mut closures: ClosureMap = HashMap::with_capacity(vertices.len());
        while let Some(v) = queue.pop_front() {
            let mut set = HashSet::new();
            for n in self.graph.taxonomic_neighbors(v, dir, self.predicates) {
                set.insert(n);
                if let Some(inner) = closures.get(&n) {
                    set.extend(inner.iter().copied());
                }
            }
            closures.insert(v, set);

            // Every edge into `v` along `dir` is now resolved for its origin.
            for p in self
                .graph
                .taxonomic_neighbors(v, dir.reverse(), self.predicates)
            {
                if let Some(degree) = pending.get_mut(&p) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(p);
                    }
                }
            }
        }

        if closures.len() < vertices.len() {
            return Err(AlgoError::CycleDetected {
                unprocessed: vertices.len() - closures.len(),
            });
        }
        Ok(closures)
    }

    /// Ancestor closures for every vertex.
    pub fn all_ancestors(&self) -> Result<ClosureMap, AlgoError> {
        self.all_closures(Direction::Out)
    }

    /// Descendant closures for every vertex.
    pub fn all_descendants(&self) -> Result<ClosureMap, AlgoError> {
        self.all_closures(Direction::In)
    }

    /// Edge-count distances from `from` to every vertex reachable along
    /// taxonomic edges in `dir`. Includes `from` at distance 0.
    pub fn distances(&self, from: VertexId, dir: Direction) -> DistanceMap {
        let mut dist: DistanceMap = HashMap::new();
        dist.insert(from, 0);
        let mut queue = VecDeque::from([from]);
        while let Some(u) = queue.pop_front() {
            let next = dist[&u] + 1;
            for n in self.graph.taxonomic_neighbors(u, dir, self.predicates) {
                if !dist.contains_key(&n) {
                    dist.insert(n, next);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    /// Edge-count distances from `from` treating taxonomic edges as
    /// undirected.
    ///
    /// One such traversal rooted at a most-specific ancestor yields the
    /// distances to the global root (above) and to both query vertices
    /// (below) at once.
    pub fn distances_undirected(&self, from: VertexId) -> DistanceMap {
        let mut dist: DistanceMap = HashMap::new();
        dist.insert(from, 0);
        let mut queue = VecDeque::from([from]);
        while let Some(u) = queue.pop_front() {
            let next = dist[&u] + 1;
            for dir in [Direction::Out, Direction::In] {
                for n in self.graph.taxonomic_neighbors(u, dir, self.predicates) {
                    if !dist.contains_key(&n) {
                        dist.insert(n, next);
                        queue.push_back(n);
                    }
                }
            }
        }
        dist
    }

    /// All most-specific common ancestors of `a` and `b`: the common
    /// ancestors (either vertex counts as its own ancestor here) minimizing
    /// the summed directed distance from both, ordered by IRI for
    /// determinism.
    pub fn most_specific_ancestors(
        &self,
        a: VertexId,
        b: VertexId,
    ) -> Result<Vec<VertexId>, AlgoError> {
        let from_a = self.distances(a, Direction::Out);
        let from_b = self.distances(b, Direction::Out);

        let mut best: u64 = u64::MAX;
        let mut ties: Vec<VertexId> = Vec::new();
        for (&candidate, &da) in &from_a {
            if let Some(&db) = from_b.get(&candidate) {
                let sum = da + db;
                if sum < best {
                    best = sum;
                    ties.clear();
                    ties.push(candidate);
                } else if sum == best {
                    ties.push(candidate);
                }
            }
        }

        if ties.is_empty() {
            return Err(AlgoError::NoCommonAncestor {
                a: self.describe(a),
                b: self.describe(b),
            });
        }
        ties.sort_by(|&x, &y| self.graph.iri_of(x).cmp(&self.graph.iri_of(y)));
        Ok(ties)
    }

    /// The most-specific common ancestor of `a` and `b`; ties are broken by
    /// smallest IRI.
    pub fn most_specific_ancestor(&self, a: VertexId, b: VertexId) -> Result<VertexId, AlgoError> {
        let ties = self.most_specific_ancestors(a, b)?;
        Ok(ties[0])
    }

    /// The unique top of the taxonomy: the single Class or Root vertex with
    /// no outgoing taxonomic edge.
    ///
    /// Zero or several candidates is a configuration error; the remedy for
    /// several is the rerooting action.
    pub fn resolve_root(&self) -> Result<VertexId, AlgoError> {
        let mut candidates: Vec<VertexId> = self
            .graph
            .vertices(None)
            .into_iter()
            .filter(|&v| {
                let kind = match self.graph.vertex_info(v) {
                    Some(info) => info.kind,
                    None => return false,
                };
                matches!(kind, VertexKind::Class | VertexKind::Root)
                    && self
                        .graph
                        .taxonomic_neighbors(v, Direction::Out, self.predicates)
                        .is_empty()
            })
            .collect();

        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            0 => Err(AlgoError::config(
                "graph has no top-level class; cannot resolve a root",
            )),
            n => Err(AlgoError::config(format!(
                "graph has {} top-level classes; apply the rerooting action first",
                n
            ))),
        }
    }

    fn describe(&self, v: VertexId) -> String {
        match self.graph.iri_of(v) {
            Some(iri) => iri.to_string(),
            None => format!("VertexId({})", v),
        }
    }
}
