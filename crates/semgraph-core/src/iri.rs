//! Validated IRI identifiers.
//!
//! Every vertex and predicate is addressed by an [`Iri`]. Validation is
//! deliberately shallow -- a scheme separator must be present and the string
//! must be free of whitespace and control characters. Full RFC 3987 parsing
//! belongs to the (external) triple-loading layer, not here.
//!
//! `Iri` implements `Ord` lexicographically; deterministic tie-breaking in
//! the engines relies on this ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// An owned, validated IRI string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Parses and validates an IRI string.
    ///
    /// Fails with [`GraphError::MalformedIri`] when the string is empty,
    /// lacks a scheme separator (`:`), or contains whitespace or control
    /// characters.
    pub fn parse(value: &str) -> Result<Self, GraphError> {
        if value.is_empty() {
            return Err(GraphError::MalformedIri {
                value: value.to_owned(),
                reason: "empty string",
            });
        }
        if !value.contains(':') {
            return Err(GraphError::MalformedIri {
                value: value.to_owned(),
                reason: "missing scheme separator ':'",
            });
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GraphError::MalformedIri {
                value: value.to_owned(),
                reason: "contains whitespace or control character",
            });
        }
        Ok(Iri(value.to_owned()))
    }

    /// Constructs an `Iri` from a compile-time constant known to be valid.
    ///
    /// Only used for the vocabulary tables in [`crate::vocab`].
    pub(crate) fn from_static(value: &'static str) -> Self {
        Iri(value.to_owned())
    }

    /// The IRI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment or final path segment, e.g. `subClassOf` for
    /// `http://www.w3.org/2000/01/rdf-schema#subClassOf`.
    ///
    /// Falls back to the full string when no `#` or `/` is present.
    pub fn local_name(&self) -> &str {
        let after_hash = self.0.rsplit('#').next().unwrap_or(&self.0);
        if after_hash.len() < self.0.len() {
            return after_hash;
        }
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
