//! Predicate registry: which predicates form the taxonomy, and inverse
//! predicate mappings.
//!
//! The registry is an explicitly owned value passed by reference to every
//! engine that needs predicate or inverse lookups. Its lifetime is scoped to
//! a processing session, never to the process.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GraphError;
use crate::iri::Iri;
use crate::vocab;

/// Registry of taxonomic predicates and their inverses.
///
/// A fresh registry already contains `rdfs:subClassOf` in the taxonomic set.
/// Insertion order of registered predicates is preserved, so iteration is
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredicateRegistry {
    taxonomic: IndexSet<Iri>,
    inverses: HashMap<Iri, Iri>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        let mut taxonomic = IndexSet::new();
        taxonomic.insert(vocab::rdfs_subclassof());
        PredicateRegistry {
            taxonomic,
            inverses: HashMap::new(),
        }
    }

    /// Adds a predicate to the taxonomic set. Returns `true` if it was not
    /// registered before.
    pub fn register(&mut self, predicate: Iri) -> bool {
        self.taxonomic.insert(predicate)
    }

    /// Whether the predicate participates in the subsumption relation.
    pub fn is_taxonomic(&self, predicate: &Iri) -> bool {
        self.taxonomic.contains(predicate)
    }

    /// The registered taxonomic predicates, in insertion order.
    pub fn taxonomic_predicates(&self) -> impl Iterator<Item = &Iri> {
        self.taxonomic.iter()
    }

    /// Declares `a` and `b` as inverses of each other.
    ///
    /// Fails with [`GraphError::InverseConflict`] when either predicate is
    /// already mapped to a different inverse.
    pub fn define_inverse(&mut self, a: Iri, b: Iri) -> Result<(), GraphError> {
        for (key, other) in [(&a, &b), (&b, &a)] {
            if let Some(existing) = self.inverses.get(key) {
                if existing != other {
                    return Err(GraphError::InverseConflict {
                        predicate: key.clone(),
                        existing: existing.clone(),
                        attempted: other.clone(),
                    });
                }
            }
        }
        self.inverses.insert(a.clone(), b.clone());
        self.inverses.insert(b, a);
        Ok(())
    }

    /// The declared inverse of a predicate, if any.
    pub fn inverse_of(&self, predicate: &Iri) -> Option<&Iri> {
        self.inverses.get(predicate)
    }

    /// Mints an inverse predicate for `predicate` in the toolkit namespace,
    /// registers it as taxonomic, and records the inverse mapping.
    ///
    /// The minted IRI is `{SEMGRAPH_NS}{local_name}_inverse`.
    pub fn create_inverse(&mut self, predicate: &Iri) -> Result<Iri, GraphError> {
        let minted = Iri::parse(&format!(
            "{}{}_inverse",
            vocab::SEMGRAPH_NS,
            predicate.local_name()
        ))?;
        self.register(minted.clone());
        self.define_inverse(predicate.clone(), minted.clone())?;
        Ok(minted)
    }
}

impl Default for PredicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
