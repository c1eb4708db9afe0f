//! The similarity measure family.
//!
//! Every measure is a pure function of a [`PairContext`]: the distance
//! triple derived from the most-specific common ancestor, plus the closure
//! statistics used by the information-content family. Edge-counting
//! measures ignore the statistics.
//!
//! The numeric range of each measure is documented on its type.

pub mod edge_based;
pub mod ic;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

pub use edge_based::{PekarStaab, Rada, WuPalmer};
pub use ic::ResnikSeco;

/// Everything a measure may consume for one vertex pair.
///
/// Distances are edge counts over the taxonomic relation, as `f64` so the
/// formulas stay in floating point throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContext {
    /// Distance from the most-specific ancestor up to the global root.
    pub d_msa_root: f64,
    /// Distance from the most-specific ancestor down to the first vertex.
    pub d_msa_a: f64,
    /// Distance from the most-specific ancestor down to the second vertex.
    pub d_msa_b: f64,
    /// Exclusive descendant count of the most-specific ancestor.
    pub msa_descendants: usize,
    /// Number of taxonomic vertices in the graph.
    pub taxonomy_size: usize,
}

/// A pure pairwise scoring function.
pub trait SimilarityMeasure {
    fn score(&self, ctx: &PairContext) -> f64;
}

/// Identifier of a measure in the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureKind {
    PekarStaab,
    Rada,
    WuPalmer,
    ResnikSeco,
}

impl MeasureKind {
    /// The scoring function for this kind.
    pub fn measure(self) -> &'static dyn SimilarityMeasure {
        match self {
            MeasureKind::PekarStaab => &PekarStaab,
            MeasureKind::Rada => &Rada,
            MeasureKind::WuPalmer => &WuPalmer,
            MeasureKind::ResnikSeco => &ResnikSeco,
        }
    }

    /// All known measure identifiers.
    pub fn all() -> &'static [MeasureKind] {
        &[
            MeasureKind::PekarStaab,
            MeasureKind::Rada,
            MeasureKind::WuPalmer,
            MeasureKind::ResnikSeco,
        ]
    }

    fn id(self) -> &'static str {
        match self {
            MeasureKind::PekarStaab => "pekar-staab",
            MeasureKind::Rada => "rada",
            MeasureKind::WuPalmer => "wu-palmer",
            MeasureKind::ResnikSeco => "resnik-seco",
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MeasureKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MeasureKind::all()
            .iter()
            .copied()
            .find(|kind| kind.id() == wanted)
            .ok_or(SimError::UnknownMeasure { id: s.to_owned() })
    }
}

/// A selected measure plus its option mapping.
///
/// The option map is reserved for measure-specific parameters; the current
/// family takes none, but the configuration surface mirrors the action
/// specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureConfig {
    pub kind: MeasureKind,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl MeasureConfig {
    pub fn new(kind: MeasureKind) -> Self {
        MeasureConfig {
            kind,
            options: BTreeMap::new(),
        }
    }

    /// Parses a measure identifier such as `pekar-staab`.
    pub fn parse(id: &str) -> Result<Self, SimError> {
        Ok(MeasureConfig::new(MeasureKind::from_str(id)?))
    }
}
