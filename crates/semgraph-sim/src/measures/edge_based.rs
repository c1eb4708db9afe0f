//! Edge-counting measures: scores derived purely from the distance triple.

use super::{PairContext, SimilarityMeasure};

/// The reference edge-counting measure.
///
/// `sim = d(msa, root) / (d(msa, root) + d(msa, a) + d(msa, b))`
///
/// Range [0, 1]. A zero denominator means a, b, the ancestor and the root
/// all coincide; the score is then 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct PekarStaab;

impl SimilarityMeasure for PekarStaab {
    fn score(&self, ctx: &PairContext) -> f64 {
        let denominator = ctx.d_msa_root + ctx.d_msa_a + ctx.d_msa_b;
        if denominator == 0.0 {
            return 1.0;
        }
        ctx.d_msa_root / denominator
    }
}

/// Inverse path length through the common ancestor.
///
/// `sim = 1 / (1 + d(msa, a) + d(msa, b))`
///
/// Range (0, 1]; identical vertices score 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rada;

impl SimilarityMeasure for Rada {
    fn score(&self, ctx: &PairContext) -> f64 {
        1.0 / (1.0 + ctx.d_msa_a + ctx.d_msa_b)
    }
}

/// Depth-weighted conceptual similarity.
///
/// `sim = 2 d(msa, root) / (d(msa, a) + d(msa, b) + 2 d(msa, root))`
///
/// Range [0, 1]. A zero denominator (root compared with itself) scores 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct WuPalmer;

impl SimilarityMeasure for WuPalmer {
    fn score(&self, ctx: &PairContext) -> f64 {
        let doubled_depth = 2.0 * ctx.d_msa_root;
        let denominator = ctx.d_msa_a + ctx.d_msa_b + doubled_depth;
        if denominator == 0.0 {
            return 1.0;
        }
        doubled_depth / denominator
    }
}
