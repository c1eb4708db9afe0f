//! Edge reduction: transitive reduction of the subsumption relation and
//! elimination of redundant instance annotations.
//!
//! Both operations compute full closures once, collect every redundant edge,
//! and only then mutate, so the result does not depend on edge processing
//! order and each function is internally atomic.

use std::collections::HashSet;

use serde::Serialize;

use semgraph_core::{Direction, EdgeId, GraphStore, PredicateRegistry, VertexKind};

use crate::closure::ClosureEngine;
use crate::error::AlgoError;

/// Outcome of a transitive reduction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReductionReport {
    /// Taxonomic edges present before the run.
    pub edges_before: usize,
    /// Edges removed as transitively redundant.
    pub edges_removed: usize,
}

impl ReductionReport {
    /// Share of taxonomic edges removed, in percent.
    pub fn removed_percent(&self) -> f64 {
        if self.edges_before == 0 {
            return 0.0;
        }
        self.edges_removed as f64 * 100.0 / self.edges_before as f64
    }
}

/// Outcome of a redundant-annotation elimination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    /// Instances examined.
    pub instances_total: usize,
    /// Instances that carried at least one redundant annotation.
    pub instances_flagged: usize,
    /// `rdf:type` edges present before the run.
    pub annotations_before: usize,
    /// `rdf:type` edges removed.
    pub annotations_removed: usize,
}

impl AnnotationReport {
    /// Share of instances carrying a redundant annotation, in percent.
    pub fn flagged_percent(&self) -> f64 {
        if self.instances_total == 0 {
            return 0.0;
        }
        self.instances_flagged as f64 * 100.0 / self.instances_total as f64
    }

    /// Share of annotations removed, in percent.
    pub fn removed_percent(&self) -> f64 {
        if self.annotations_before == 0 {
            return 0.0;
        }
        self.annotations_removed as f64 * 100.0 / self.annotations_before as f64
    }

    /// Annotations surviving the run.
    pub fn annotations_after(&self) -> usize {
        self.annotations_before - self.annotations_removed
    }
}

/// Transitive reduction of the subsumption relation.
///
/// Removes every taxonomic edge (u, v) for which an alternate taxonomic
/// path u -> ... -> v of length >= 2 exists: v must then be in the ancestor
/// closure of some other direct neighbor of u. The surviving edge set is the
/// unique minimal one with identical reachability; running the reduction
/// again removes nothing.
pub fn transitive_reduction(
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
) -> Result<ReductionReport, AlgoError> {
    let mut redundant: Vec<EdgeId> = Vec::new();
    let mut edges_before = 0;
    {
        let engine = ClosureEngine::new(g, predicates);
        let ancestors = engine.all_closures(Direction::Out)?;

        for v in g.vertices(None) {
            let direct = g.taxonomic_edges_of(v, Direction::Out, predicates);
            edges_before += direct.len();
            if direct.len() < 2 {
                continue;
            }
            for &(edge, target) in &direct {
                let has_alternate_path = direct.iter().any(|&(other_edge, other_target)| {
                    other_edge != edge
                        && other_target != target
                        && ancestors
                            .get(&other_target)
                            .is_some_and(|closure| closure.contains(&target))
                });
                if has_alternate_path {
                    redundant.push(edge);
                }
            }
        }
    }

    let edges_removed = g.remove_edges(redundant);
    let report = ReductionReport {
        edges_before,
        edges_removed,
    };
    tracing::info!(
        edges_before = report.edges_before,
        edges_removed = report.edges_removed,
        "transitive reduction complete"
    );
    Ok(report)
}

/// Removes redundant `rdf:type` annotations from instances.
///
/// Among the classes annotating one instance, an annotation to `Ci` is
/// redundant when another surviving annotation `Cj` lies in the descendant
/// closure of `Ci` -- `Ci` is then the less specific of the two. Only the
/// most specific annotations survive.
pub fn reduce_type_annotations(
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
) -> Result<AnnotationReport, AlgoError> {
    let mut report = AnnotationReport {
        instances_total: 0,
        instances_flagged: 0,
        annotations_before: 0,
        annotations_removed: 0,
    };
    let mut redundant_all: Vec<EdgeId> = Vec::new();
    {
        let engine = ClosureEngine::new(g, predicates);
        let descendants = engine.all_closures(Direction::In)?;

        for instance in g.vertices(Some(VertexKind::Instance)) {
            report.instances_total += 1;
            let annotations = g.type_edges(instance);
            report.annotations_before += annotations.len();
            if annotations.len() < 2 {
                continue;
            }

            let mut redundant: HashSet<EdgeId> = HashSet::new();
            for &(edge, class) in &annotations {
                if redundant.contains(&edge) {
                    continue;
                }
                let superseded = annotations.iter().any(|&(other_edge, other_class)| {
                    other_edge != edge
                        && !redundant.contains(&other_edge)
                        && descendants
                            .get(&class)
                            .is_some_and(|closure| closure.contains(&other_class))
                });
                if superseded {
                    redundant.insert(edge);
                }
            }

            if !redundant.is_empty() {
                report.instances_flagged += 1;
                report.annotations_removed += redundant.len();
                redundant_all.extend(redundant);
            }
        }
    }

    g.remove_edges(redundant_all);
    tracing::info!(
        instances = report.instances_total,
        flagged = report.instances_flagged,
        flagged_percent = report.flagged_percent(),
        annotations_before = report.annotations_before,
        annotations_removed = report.annotations_removed,
        removed_percent = report.removed_percent(),
        "redundant annotation elimination complete"
    );
    Ok(report)
}
