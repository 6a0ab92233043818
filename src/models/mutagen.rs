use super::{Gene, RoutingMode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Range a mutated weight is redrawn from.
///
/// Wider than the `[0, 1)` range genes start from, so a single mutation can
/// pull a large share of traffic onto one path.
pub const MUTATION_WEIGHT_RANGE: Range<f64> = 0.0..2.0;

// ============================================================
// MutationRate
// ============================================================
/// Probability that a gene is mutated during one call to `Chromosome::mutate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct MutationRate(f64);

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
pub struct MutationRateOutOfRange(f64);

impl MutationRate {
    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for MutationRate {
    type Error = MutationRateOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MutationRate> for f64 {
    fn from(rate: MutationRate) -> Self {
        rate.0
    }
}

// ============================================================
// Weight redraw
// ============================================================
/// Overwrites one uniformly chosen weight with a fresh draw from
/// [`MUTATION_WEIGHT_RANGE`] and renormalizes the gene.
pub(crate) fn redraw_weight<R: Rng>(rng: &mut R, gene: &mut Gene, routing: RoutingMode) {
    let index = rng.random_range(0..gene.len());
    gene.weights_mut()[index] = rng.random_range(MUTATION_WEIGHT_RANGE);
    gene.normalize(routing);
}
