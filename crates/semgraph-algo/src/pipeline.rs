//! The action pipeline: ordered execution of graph transformations.
//!
//! Actions run sequentially against an exclusively borrowed graph -- the
//! mutation phase is single-writer by construction. There is no rollback:
//! when action *i* fails, the graph reflects actions 0..i-1 and the error is
//! surfaced to the caller.

use semgraph_core::{GraphStore, PredicateRegistry, VertexKind};

use crate::actions::{ActionSpec, GraphAction, ReductionTarget};
use crate::collab::{Reasoner, Statement, TypeInferencer};
use crate::error::AlgoError;
use crate::prune::{prune_vertices, reroot};
use crate::reduction::{reduce_type_annotations, transitive_reduction};

/// The injected external capabilities available to a pipeline run.
///
/// Missing collaborators are fine as long as no action needs them; an
/// action that does fails with a configuration error.
#[derive(Default)]
pub struct Collaborators<'a> {
    pub reasoner: Option<&'a dyn Reasoner>,
    pub type_inferencer: Option<&'a dyn TypeInferencer>,
}

impl<'a> Collaborators<'a> {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Compiles and runs an ordered list of action specs.
///
/// All specs are compiled up front, so configuration errors surface before
/// any mutation. Execution then proceeds in order and aborts on the first
/// failure.
pub fn apply_actions(
    specs: &[ActionSpec],
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
    collaborators: &Collaborators<'_>,
) -> Result<(), AlgoError> {
    let actions = specs
        .iter()
        .map(ActionSpec::compile)
        .collect::<Result<Vec<_>, _>>()?;
    apply_compiled(&actions, g, predicates, collaborators)
}

/// Runs already-compiled actions in order, aborting on the first failure.
pub fn apply_compiled(
    actions: &[GraphAction],
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
    collaborators: &Collaborators<'_>,
) -> Result<(), AlgoError> {
    for (step, action) in actions.iter().enumerate() {
        tracing::info!(step, kind = action.kind(), "applying graph action");
        apply_one(action, g, predicates, collaborators)?;
    }
    Ok(())
}

fn apply_one(
    action: &GraphAction,
    g: &mut GraphStore,
    predicates: &PredicateRegistry,
    collaborators: &Collaborators<'_>,
) -> Result<(), AlgoError> {
    match action {
        GraphAction::TransitiveReduction { target } => match target {
            ReductionTarget::Classes => {
                transitive_reduction(g, predicates)?;
            }
            ReductionTarget::Instances => {
                reduce_type_annotations(g, predicates)?;
            }
        },
        GraphAction::Rerooting { root } => {
            reroot(g, predicates, root)?;
        }
        GraphAction::TypeVertices { strict } => {
            let inferencer = collaborators.type_inferencer.ok_or_else(|| {
                AlgoError::config("action 'type_vertices' requires a type-inference collaborator")
            })?;
            let complete = inferencer.infer_types(g)?;
            if !complete {
                if *strict {
                    return Err(AlgoError::Collaborator {
                        reason: "type inference failed to resolve all vertex kinds".to_owned(),
                    });
                }
                tracing::warn!("type inference left some vertex kinds unresolved");
            }
        }
        GraphAction::RdfsInference => {
            let reasoner = collaborators.reasoner.ok_or_else(|| {
                AlgoError::config("action 'rdfs_inference' requires a reasoner collaborator")
            })?;
            run_inference(reasoner, g)?;
        }
        GraphAction::VerticesReduction(criterion) => {
            prune_vertices(g, predicates, criterion)?;
        }
    }
    Ok(())
}

/// Snapshots the edge set, asks the reasoner for entailed statements, and
/// merges them back in. Statements over unknown IRIs create vertices whose
/// kind is derived from the predicate (`rdf:type` subjects are instances,
/// everything else is a class); duplicate edges are skipped.
fn run_inference(reasoner: &dyn Reasoner, g: &mut GraphStore) -> Result<(), AlgoError> {
    let snapshot: Vec<Statement> = g
        .edge_triples()
        .filter_map(|(s, p, o)| {
            let subject = g.iri_of(s)?.clone();
            let object = g.iri_of(o)?.clone();
            Some(Statement::new(subject, p.clone(), object))
        })
        .collect();

    let entailed = reasoner.infer(&snapshot)?;
    let mut added = 0;
    for statement in &entailed {
        let subject_kind = if statement.predicate.as_str() == semgraph_core::vocab::RDF_TYPE {
            VertexKind::Instance
        } else {
            VertexKind::Class
        };
        let s = g.get_or_create_vertex(statement.subject.clone(), subject_kind);
        let o = g.get_or_create_vertex(statement.object.clone(), VertexKind::Class);
        if !g.has_edge(s, &statement.predicate, o) {
            g.add_edge(s, statement.predicate.clone(), o)?;
            added += 1;
        }
    }
    tracing::info!(
        snapshot = snapshot.len(),
        entailed = entailed.len(),
        added,
        "merged entailed statements"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use semgraph_core::{vocab, Iri, VertexId};

    use crate::collab::CollabError;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn class(g: &mut GraphStore, s: &str) -> VertexId {
        g.create_vertex(iri(s), VertexKind::Class).unwrap()
    }

    /// Returns a fixed statement list regardless of input.
    struct FixedReasoner(Vec<Statement>);

    impl Reasoner for FixedReasoner {
        fn infer(&self, _statements: &[Statement]) -> Result<Vec<Statement>, CollabError> {
            Ok(self.0.clone())
        }
    }

    struct FailingReasoner;

    impl Reasoner for FailingReasoner {
        fn infer(&self, _statements: &[Statement]) -> Result<Vec<Statement>, CollabError> {
            Err(CollabError("reasoner backend unavailable".to_owned()))
        }
    }

    /// Reports the given completeness without touching the graph.
    struct FixedTyper(bool);

    impl TypeInferencer for FixedTyper {
        fn infer_types(&self, _graph: &mut GraphStore) -> Result<bool, CollabError> {
            Ok(self.0)
        }
    }

    #[test]
    fn actions_run_in_order() {
        // Reroot, then transitively reduce. The shortcut b -> root is only
        // redundant once the rerooting has attached a under the root, so the
        // second action depends on the first having run.
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let root = class(&mut g, vocab::SYNTHETIC_ROOT);
        let a = class(&mut g, "http://example.org/ns#A");
        let b = class(&mut g, "http://example.org/ns#B");
        g.add_edge(b, vocab::rdfs_subclassof(), a).unwrap();
        g.add_edge(b, vocab::rdfs_subclassof(), root).unwrap();

        let specs = vec![
            ActionSpec::new("rerooting")
                .with_option("root_uri", vocab::SYNTHETIC_ROOT),
            ActionSpec::new("transitive_reduction").with_option("target", "CLASSES"),
        ];

        apply_actions(&specs, &mut g, &registry, &Collaborators::none()).unwrap();

        assert!(g.has_edge(a, &vocab::rdfs_subclassof(), root));
        assert!(g.has_edge(b, &vocab::rdfs_subclassof(), a));
        // The shortcut was removed: b reaches the root through a.
        assert!(!g.has_edge(b, &vocab::rdfs_subclassof(), root));
    }

    #[test]
    fn compilation_errors_precede_mutation() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        class(&mut g, "http://example.org/ns#A");
        let generation = g.generation();

        let specs = vec![
            ActionSpec::new("rerooting").with_option("root_uri", vocab::SYNTHETIC_ROOT),
            ActionSpec::new("frobnicate"),
        ];
        let err = apply_actions(&specs, &mut g, &registry, &Collaborators::none()).unwrap_err();
        assert!(matches!(err, AlgoError::Configuration { .. }));
        // The bad second action was caught before the first one ran.
        assert_eq!(g.generation(), generation);
    }

    #[test]
    fn runtime_failure_keeps_prefix_effects() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        class(&mut g, "http://example.org/ns#A");

        let specs = vec![
            ActionSpec::new("rerooting").with_option("root_uri", vocab::SYNTHETIC_ROOT),
            // Valid spec, fails at runtime: subtree root does not exist.
            ActionSpec::new("vertices_reduction")
                .with_option("root_uri", "http://example.org/ns#Missing"),
        ];
        let err = apply_actions(&specs, &mut g, &registry, &Collaborators::none()).unwrap_err();
        assert!(matches!(err, AlgoError::Configuration { .. }));
        // The rerooting ran and its effects persist.
        assert!(g.vertex(&vocab::synthetic_root()).is_some());
    }

    #[test]
    fn rdfs_inference_requires_reasoner() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let specs = vec![ActionSpec::new("rdfs_inference")];
        let err = apply_actions(&specs, &mut g, &registry, &Collaborators::none()).unwrap_err();
        assert!(err.to_string().contains("reasoner"));
    }

    #[test]
    fn rdfs_inference_merges_entailed_statements() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let a = class(&mut g, "http://example.org/ns#A");
        let b = class(&mut g, "http://example.org/ns#B");
        g.add_edge(b, vocab::rdfs_subclassof(), a).unwrap();

        let reasoner = FixedReasoner(vec![
            // Already present: must not be duplicated.
            Statement::new(
                iri("http://example.org/ns#B"),
                vocab::rdfs_subclassof(),
                iri("http://example.org/ns#A"),
            ),
            // New edge between known vertices.
            Statement::new(
                iri("http://example.org/ns#B"),
                vocab::rdfs_subclassof(),
                iri("http://example.org/ns#C"),
            ),
            // rdf:type statement over an unknown subject.
            Statement::new(
                iri("http://example.org/ns#i"),
                vocab::rdf_type(),
                iri("http://example.org/ns#B"),
            ),
        ]);
        let collaborators = Collaborators {
            reasoner: Some(&reasoner),
            type_inferencer: None,
        };

        let specs = vec![ActionSpec::new("rdfs_inference")];
        apply_actions(&specs, &mut g, &registry, &collaborators).unwrap();

        assert_eq!(g.edge_count(), 3);
        let c = g.vertex(&iri("http://example.org/ns#C")).unwrap();
        assert_eq!(g.vertex_info(c).unwrap().kind, VertexKind::Class);
        let i = g.vertex(&iri("http://example.org/ns#i")).unwrap();
        assert_eq!(g.vertex_info(i).unwrap().kind, VertexKind::Instance);
        assert!(g.has_edge(i, &vocab::rdf_type(), b));
    }

    #[test]
    fn failing_reasoner_is_fatal() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let collaborators = Collaborators {
            reasoner: Some(&FailingReasoner),
            type_inferencer: None,
        };
        let specs = vec![ActionSpec::new("rdfs_inference")];
        let err = apply_actions(&specs, &mut g, &registry, &collaborators).unwrap_err();
        assert!(matches!(err, AlgoError::Collaborator { .. }));
    }

    #[test]
    fn incomplete_typing_fatal_only_when_strict() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let typer = FixedTyper(false);
        let collaborators = Collaborators {
            reasoner: None,
            type_inferencer: Some(&typer),
        };

        let lenient = vec![ActionSpec::new("type_vertices")];
        apply_actions(&lenient, &mut g, &registry, &collaborators).unwrap();

        let strict = vec![ActionSpec::new("type_vertices").with_option("stopfail", "true")];
        let err = apply_actions(&strict, &mut g, &registry, &collaborators).unwrap_err();
        assert!(matches!(err, AlgoError::Collaborator { .. }));
    }

    #[test]
    fn complete_typing_passes_strict() {
        let mut g = GraphStore::new();
        let registry = PredicateRegistry::new();
        let typer = FixedTyper(true);
        let collaborators = Collaborators {
            reasoner: None,
            type_inferencer: Some(&typer),
        };
        let specs = vec![ActionSpec::new("type_vertices").with_option("stopfail", "true")];
        apply_actions(&specs, &mut g, &registry, &collaborators).unwrap();
    }
}
