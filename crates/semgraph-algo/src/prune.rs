//! Vertex pruning and rerooting.
//!
//! Pruning removes vertices by one of four criteria; rerooting attaches
//! every top-level class under a single (possibly freshly created) root so
//! that downstream engines can rely on a unique top.

use std::collections::HashSet;

use serde::Serialize;

use semgraph_core::vocab::{self, Vocabulary};
use semgraph_core::{Direction, GraphStore, Iri, PredicateRegistry, VertexId, VertexKind};

use crate::closure::ClosureEngine;
use crate::error::AlgoError;

/// Which vertices a `vertices_reduction` action removes.
#[derive(Debug, Clone)]
pub enum PruneCriterion {
    /// Vertices whose IRI matches the pattern (substring match).
    Regex(regex::Regex),
    /// Vertices belonging to the listed standard vocabularies.
    Vocabulary(Vec<Vocabulary>),
    /// An externally supplied identifier list; absent identifiers are
    /// skipped.
    IdentifierList(Vec<Iri>),
    /// Classes outside the subtree rooted at the given vertex, then
    /// instances orphaned by that removal.
    Subtree(Iri),
}

/// Outcome of a pruning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Vertices present before the run.
    pub vertices_before: usize,
    /// Vertices removed, instances included.
    pub vertices_removed: usize,
    /// Instances removed because they lost their last `rdf:type` edge
    /// (subtree criterion only).
    pub instances_removed: usize,
}

impl PruneReport {
    /// Share of vertices removed, in percent.
    pub fn removed_percent(&self) -> f64 {
        if self.vertices_before == 0 {
            return 0.0;
        }
        self.vertices_removed as f64 * 100.0 / self.vertices_before as f64
    }
}

/// Outcome of a rerooting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RerootReport {
    /// The resolved or created root.
    pub root: Iri,
    /// Whether the root vertex was created by this run.
    pub created_root: bool,
    /// Top-level classes attached under the root.
    pub attached: usize,
}

/// Removes vertices matching `criterion`. See [`PruneCriterion`].
pub fn prune_vertices(
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
    criterion: &PruneCriterion,
) -> Result<PruneReport, AlgoError> {
    let vertices_before = g.vertex_count();
    let mut instances_removed = 0;

    let removed = match criterion {
        PruneCriterion::Regex(pattern) => {
            let doomed: Vec<VertexId> = g
                .vertices(None)
                .into_iter()
                .filter(|&v| {
                    g.iri_of(v)
                        .map(|iri| pattern.is_match(iri.as_str()))
                        .unwrap_or(false)
                })
                .collect();
            g.remove_vertices(doomed)
        }
        PruneCriterion::Vocabulary(vocabularies) => {
            let mut doomed: Vec<VertexId> = Vec::new();
            for vocabulary in vocabularies {
                for term in vocabulary.terms() {
                    let iri = Iri::parse(term)?;
                    if let Some(v) = g.vertex(&iri) {
                        doomed.push(v);
                    }
                }
            }
            g.remove_vertices(doomed)
        }
        PruneCriterion::IdentifierList(iris) => {
            let doomed: Vec<VertexId> = iris.iter().filter_map(|iri| g.vertex(iri)).collect();
            g.remove_vertices(doomed)
        }
        PruneCriterion::Subtree(root_iri) => {
            let root = g.vertex(root_iri).ok_or_else(|| {
                AlgoError::config(format!("cannot resolve subtree root {}", root_iri))
            })?;

            let doomed_classes: Vec<VertexId> = {
                let engine = ClosureEngine::new(g, predicates);
                let mut keep: HashSet<VertexId> = engine.descendants(root)?;
                keep.insert(root);
                g.vertices(None)
                    .into_iter()
                    .filter(|&v| {
                        g.vertex_info(v)
                            .map(|info| info.kind.is_taxonomic())
                            .unwrap_or(false)
                            && !keep.contains(&v)
                    })
                    .collect()
            };
            let mut removed = g.remove_vertices(doomed_classes);

            // Class removal must precede this sweep: instances that lost
            // their last annotation are no longer linked to the taxonomy.
            let orphaned: Vec<VertexId> = g
                .vertices(Some(VertexKind::Instance))
                .into_iter()
                .filter(|&i| g.type_edges(i).is_empty())
                .collect();
            instances_removed = g.remove_vertices(orphaned);
            removed += instances_removed;
            removed
        }
    };

    let report = PruneReport {
        vertices_before,
        vertices_removed: removed,
        instances_removed,
    };
    tracing::info!(
        vertices_before = report.vertices_before,
        vertices_removed = report.vertices_removed,
        instances_removed = report.instances_removed,
        removed_percent = report.removed_percent(),
        "vertex pruning complete"
    );
    Ok(report)
}

/// Attaches every top-level class as a direct subclass of `root_iri`.
///
/// When `root_iri` is the reserved synthetic root (see
/// [`vocab::SYNTHETIC_ROOT`]) and absent from the graph, the vertex is
/// created; any other unresolvable IRI is a configuration error. Taxonomic
/// vertices with an empty ancestor closure -- no outgoing taxonomic edge --
/// gain an `rdfs:subClassOf` edge to the root; the root itself is left
/// untouched.
pub fn reroot(
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
    root_iri: &Iri,
) -> Result<RerootReport, AlgoError> {
    let mut created_root = false;
    let root = match g.vertex(root_iri) {
        Some(id) => id,
        None if root_iri.as_str() == vocab::SYNTHETIC_ROOT => {
            created_root = true;
            g.create_vertex(root_iri.clone(), VertexKind::Root)?
        }
        None => {
            return Err(AlgoError::config(format!(
                "cannot resolve rerooting target {}",
                root_iri
            )))
        }
    };

    let tops: Vec<VertexId> = g
        .vertices(None)
        .into_iter()
        .filter(|&v| {
            v != root
                && g.vertex_info(v)
                    .map(|info| info.kind.is_taxonomic())
                    .unwrap_or(false)
                && g.taxonomic_neighbors(v, Direction::Out, predicates)
                    .is_empty()
        })
        .collect();

    for &v in &tops {
        g.add_edge(v, vocab::rdfs_subclassof(), root)?;
    }

    let report = RerootReport {
        root: root_iri.clone(),
        created_root,
        attached: tops.len(),
    };
    tracing::info!(
        root = %report.root,
        created_root = report.created_root,
        attached = report.attached,
        "rerooting complete"
    );
    Ok(report)
}
