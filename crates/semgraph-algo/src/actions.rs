//! Graph transformation actions.
//!
//! Actions arrive as [`ActionSpec`] values: a kind string plus a string
//! option map, the form found in configuration files. Specs are compiled
//! into [`GraphAction`] -- one strongly typed, validated variant per kind --
//! before anything executes, so every configuration error surfaces with a
//! message naming the offending option, and the execution path never
//! performs string lookups.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use semgraph_core::vocab::Vocabulary;
use semgraph_core::Iri;

use crate::error::AlgoError;
use crate::prune::PruneCriterion;

/// Wire form of an action: kind plus option mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub kind: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl ActionSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        ActionSpec {
            kind: kind.into(),
            options: BTreeMap::new(),
        }
    }

    /// Builder-style option setter.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn require_option(&self, name: &str) -> Result<&str, AlgoError> {
        self.option(name).ok_or_else(|| {
            AlgoError::config(format!(
                "action '{}' requires option '{}'",
                self.kind, name
            ))
        })
    }

    /// Validates the spec into a typed [`GraphAction`].
    pub fn compile(&self) -> Result<GraphAction, AlgoError> {
        match self.kind.to_ascii_lowercase().as_str() {
            "transitive_reduction" => {
                let target = self.require_option("target")?;
                let target = ReductionTarget::from_str(target)
                    .map_err(|reason| AlgoError::config(reason))?;
                Ok(GraphAction::TransitiveReduction { target })
            }
            "rerooting" => {
                let value = self.require_option("root_uri")?;
                if value.is_empty() {
                    return Err(AlgoError::config(
                        "action 'rerooting' requires a non-empty 'root_uri'",
                    ));
                }
                let root = Iri::parse(value).map_err(|e| {
                    AlgoError::config(format!("invalid 'root_uri' for rerooting: {}", e))
                })?;
                Ok(GraphAction::Rerooting { root })
            }
            "type_vertices" => {
                let strict = match self.option("stopfail") {
                    None => false,
                    Some(flag) => flag.trim().to_ascii_lowercase().parse::<bool>().map_err(
                        |_| {
                            AlgoError::config(format!(
                                "invalid 'stopfail' value '{}', expected true/false",
                                flag
                            ))
                        },
                    )?,
                };
                Ok(GraphAction::TypeVertices { strict })
            }
            "rdfs_inference" => Ok(GraphAction::RdfsInference),
            "vertices_reduction" => self.compile_vertices_reduction(),
            other => Err(AlgoError::config(format!(
                "unknown action kind '{}'",
                other
            ))),
        }
    }

    fn compile_vertices_reduction(&self) -> Result<GraphAction, AlgoError> {
        const CRITERIA: [&str; 4] = ["regex", "vocabulary", "iris", "root_uri"];
        let present: Vec<&str> = CRITERIA
            .iter()
            .copied()
            .filter(|name| self.option(name).is_some())
            .collect();
        if present.len() != 1 {
            return Err(AlgoError::config(format!(
                "action 'vertices_reduction' requires exactly one of {:?}, found {:?}",
                CRITERIA, present
            )));
        }

        let criterion = match present[0] {
            "regex" => {
                let pattern = self.require_option("regex")?;
                let compiled = regex::Regex::new(pattern).map_err(|e| {
                    AlgoError::config(format!("invalid regex '{}': {}", pattern, e))
                })?;
                PruneCriterion::Regex(compiled)
            }
            "vocabulary" => {
                let flags = self.require_option("vocabulary")?;
                let mut vocabularies = Vec::new();
                for flag in flags.split(',') {
                    let vocabulary = Vocabulary::from_str(flag)
                        .map_err(|reason| AlgoError::config(reason))?;
                    vocabularies.push(vocabulary);
                }
                PruneCriterion::Vocabulary(vocabularies)
            }
            "iris" => {
                let list = self.require_option("iris")?;
                let mut iris = Vec::new();
                for entry in list.split(',') {
                    let entry = entry.trim();
                    if entry.is_empty() {
                        continue;
                    }
                    let iri = Iri::parse(entry).map_err(|e| {
                        AlgoError::config(format!("invalid entry in 'iris': {}", e))
                    })?;
                    iris.push(iri);
                }
                PruneCriterion::IdentifierList(iris)
            }
            "root_uri" => {
                let value = self.require_option("root_uri")?;
                let root = Iri::parse(value).map_err(|e| {
                    AlgoError::config(format!(
                        "invalid 'root_uri' for vertices_reduction: {}",
                        e
                    ))
                })?;
                PruneCriterion::Subtree(root)
            }
            _ => unreachable!("criterion name checked above"),
        };
        Ok(GraphAction::VerticesReduction(criterion))
    }
}

/// Parses a JSON array of action specs, e.g. the content of an actions
/// configuration file.
pub fn parse_actions(json: &str) -> Result<Vec<ActionSpec>, AlgoError> {
    serde_json::from_str(json)
        .map_err(|e| AlgoError::config(format!("invalid actions document: {}", e)))
}

/// What a transitive reduction operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionTarget {
    /// Reduce subsumption edges between classes.
    Classes,
    /// Eliminate redundant `rdf:type` annotations on instances.
    Instances,
}

impl FromStr for ReductionTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLASSES" => Ok(ReductionTarget::Classes),
            "INSTANCES" => Ok(ReductionTarget::Instances),
            other => Err(format!(
                "unknown target '{}', expected CLASSES or INSTANCES",
                other
            )),
        }
    }
}

/// A validated, typed graph transformation.
#[derive(Debug, Clone)]
pub enum GraphAction {
    TransitiveReduction { target: ReductionTarget },
    Rerooting { root: Iri },
    TypeVertices { strict: bool },
    RdfsInference,
    VerticesReduction(PruneCriterion),
}

impl GraphAction {
    /// The kind string of this action, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            GraphAction::TransitiveReduction { .. } => "transitive_reduction",
            GraphAction::Rerooting { .. } => "rerooting",
            GraphAction::TypeVertices { .. } => "type_vertices",
            GraphAction::RdfsInference => "rdfs_inference",
            GraphAction::VerticesReduction(_) => "vertices_reduction",
        }
    }
}
