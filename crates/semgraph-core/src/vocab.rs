//! Vocabulary constants: core predicates, the reserved synthetic root, and
//! the RDF / RDFS / OWL term tables used by vocabulary-based pruning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::iri::Iri;

/// RDF namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDFS namespace.
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// OWL namespace.
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
/// Namespace for identifiers minted by this toolkit.
pub const SEMGRAPH_NS: &str = "http://semgraph.org/ns#";

/// The instance-typing predicate.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// The subsumption predicate seeding the taxonomic set.
pub const RDFS_SUBCLASSOF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// Reserved identifier for the synthetic root. When the rerooting action is
/// given this IRI and no such vertex exists, the vertex is created rather
/// than reported as unresolvable.
pub const SYNTHETIC_ROOT: &str = "http://semgraph.org/ns#synthetic_root";

/// `rdf:type` as an [`Iri`].
pub fn rdf_type() -> Iri {
    Iri::from_static(RDF_TYPE)
}

/// `rdfs:subClassOf` as an [`Iri`].
pub fn rdfs_subclassof() -> Iri {
    Iri::from_static(RDFS_SUBCLASSOF)
}

/// The reserved synthetic root as an [`Iri`].
pub fn synthetic_root() -> Iri {
    Iri::from_static(SYNTHETIC_ROOT)
}

/// A standard vocabulary whose terms can be pruned from a graph wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vocabulary {
    Rdf,
    Rdfs,
    Owl,
}

impl Vocabulary {
    /// The term table for this vocabulary.
    pub fn terms(self) -> &'static [&'static str] {
        match self {
            Vocabulary::Rdf => RDF_TERMS,
            Vocabulary::Rdfs => RDFS_TERMS,
            Vocabulary::Owl => OWL_TERMS,
        }
    }
}

impl FromStr for Vocabulary {
    type Err = String;

    /// Accepts the flags used in action options: `RDF`, `RDFS`, `OWL`
    /// (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RDF" => Ok(Vocabulary::Rdf),
            "RDFS" => Ok(Vocabulary::Rdfs),
            "OWL" => Ok(Vocabulary::Owl),
            other => Err(format!(
                "unknown vocabulary flag '{}', expected RDF/RDFS/OWL",
                other
            )),
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vocabulary::Rdf => f.write_str("RDF"),
            Vocabulary::Rdfs => f.write_str("RDFS"),
            Vocabulary::Owl => f.write_str("OWL"),
        }
    }
}

/// Terms of the RDF vocabulary.
pub const RDF_TERMS: &[&str] = &[
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#first",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#predicate",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#Alt",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#Seq",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#value",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#Bag",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#object",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#List",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#Statement",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#subject",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#li",
];

/// Terms of the RDFS vocabulary.
pub const RDFS_TERMS: &[&str] = &[
    "http://www.w3.org/2000/01/rdf-schema#subClassOf",
    "http://www.w3.org/2000/01/rdf-schema#label",
    "http://www.w3.org/2000/01/rdf-schema#Class",
    "http://www.w3.org/2000/01/rdf-schema#member",
    "http://www.w3.org/2000/01/rdf-schema#comment",
    "http://www.w3.org/2000/01/rdf-schema#Literal",
    "http://www.w3.org/2000/01/rdf-schema#seeAlso",
    "http://www.w3.org/2000/01/rdf-schema#Resource",
    "http://www.w3.org/2000/01/rdf-schema#Container",
    "http://www.w3.org/2000/01/rdf-schema#isDefinedBy",
    "http://www.w3.org/2000/01/rdf-schema#domain",
    "http://www.w3.org/2000/01/rdf-schema#subPropertyOf",
    "http://www.w3.org/2000/01/rdf-schema#Datatype",
    "http://www.w3.org/2000/01/rdf-schema#range",
    "http://www.w3.org/2000/01/rdf-schema#ContainerMembershipProperty",
];

/// Terms of the OWL vocabulary.
pub const OWL_TERMS: &[&str] = &[
    "http://www.w3.org/2002/07/owl#AllDifferent",
    "http://www.w3.org/2002/07/owl#allValuesFrom",
    "http://www.w3.org/2002/07/owl#AnnotationProperty",
    "http://www.w3.org/2002/07/owl#backwardCompatibleWith",
    "http://www.w3.org/2002/07/owl#cardinality",
    "http://www.w3.org/2002/07/owl#Class",
    "http://www.w3.org/2002/07/owl#complementOf",
    "http://www.w3.org/2002/07/owl#DatatypeProperty",
    "http://www.w3.org/2002/07/owl#DeprecatedClass",
    "http://www.w3.org/2002/07/owl#DeprecatedProperty",
    "http://www.w3.org/2002/07/owl#differentFrom",
    "http://www.w3.org/2002/07/owl#disjointWith",
    "http://www.w3.org/2002/07/owl#distinctMembers",
    "http://www.w3.org/2002/07/owl#equivalentClass",
    "http://www.w3.org/2002/07/owl#equivalentProperty",
    "http://www.w3.org/2002/07/owl#FunctionalProperty",
    "http://www.w3.org/2002/07/owl#hasValue",
    "http://www.w3.org/2002/07/owl#imports",
    "http://www.w3.org/2002/07/owl#incompatibleWith",
    "http://www.w3.org/2002/07/owl#Individual",
    "http://www.w3.org/2002/07/owl#intersectionOf",
    "http://www.w3.org/2002/07/owl#InverseFunctionalProperty",
    "http://www.w3.org/2002/07/owl#inverseOf",
    "http://www.w3.org/2002/07/owl#maxCardinality",
    "http://www.w3.org/2002/07/owl#minCardinality",
    "http://www.w3.org/2002/07/owl#ObjectProperty",
    "http://www.w3.org/2002/07/owl#oneOf",
    "http://www.w3.org/2002/07/owl#onProperty",
    "http://www.w3.org/2002/07/owl#Ontology",
    "http://www.w3.org/2002/07/owl#OntologyProperty",
    "http://www.w3.org/2002/07/owl#priorVersion",
    "http://www.w3.org/2002/07/owl#Restriction",
    "http://www.w3.org/2002/07/owl#sameAs",
    "http://www.w3.org/2002/07/owl#someValuesFrom",
    "http://www.w3.org/2002/07/owl#SymmetricProperty",
    "http://www.w3.org/2002/07/owl#TransitiveProperty",
    "http://www.w3.org/2002/07/owl#unionOf",
    "http://www.w3.org/2002/07/owl#versionInfo",
];
