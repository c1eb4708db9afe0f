//! Information-content measures using intrinsic IC derived from closure
//! sizes.

use super::{PairContext, SimilarityMeasure};

/// Resnik similarity with intrinsic (Seco-style) information content.
///
/// The IC of a vertex with `d` exclusive descendants in a taxonomy of `N`
/// vertices is `1 - ln(d + 1) / ln(N)`; the score of a pair is the IC of
/// their most-specific common ancestor.
///
/// Range [0, 1]: 0 for the root of the taxonomy, 1 for a shared leaf
/// ancestor. Degenerate taxonomies (fewer than two vertices) score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResnikSeco;

impl SimilarityMeasure for ResnikSeco {
    fn score(&self, ctx: &PairContext) -> f64 {
        let n = ctx.taxonomy_size as f64;
        if n < 2.0 {
            return 0.0;
        }
        1.0 - ((ctx.msa_descendants as f64 + 1.0).ln() / n.ln())
    }
}
