use super::{Demand, RoutingMode};
use rand::Rng;
use tracing::instrument;

/// One demand's share of traffic on each of its candidate paths.
///
/// Weights are non-negative and sum to 1 after every normalization. In
/// single-path routing exactly one weight is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    weights: Vec<f64>,
}

impl Gene {
    /// Draws every weight uniformly from `[0, 1)` and normalizes.
    ///
    /// # Panics
    ///
    /// If `path_count` is zero. Demands without candidate paths are rejected when the
    /// topology is built, so reaching this is a caller bug.
    #[instrument(level = "debug", skip(rng))]
    pub fn random<R: Rng>(rng: &mut R, path_count: usize, routing: RoutingMode) -> Self {
        assert!(path_count > 0, "gene requires at least one candidate path");

        let weights = (0..path_count).map(|_| rng.random::<f64>()).collect();
        Self::from_weights(weights, routing)
    }

    /// Builds a gene from explicit weights and normalizes them.
    ///
    /// # Panics
    ///
    /// If `weights` is empty or holds a negative, NaN or infinite weight.
    pub fn from_weights(weights: Vec<f64>, routing: RoutingMode) -> Self {
        assert!(!weights.is_empty(), "gene requires at least one candidate path");

        let mut gene = Self { weights };
        gene.normalize(routing);
        gene
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Scales the weights to sum to 1.
    ///
    /// An all-zero vector collapses to all traffic on path 0. In single-path routing
    /// the normalized weights collapse onto the path at the rounded weighted mean
    /// index `round(Σ i·wᵢ)`, which is not necessarily the heaviest path. Halves round
    /// to even.
    ///
    /// # Panics
    ///
    /// If any weight is negative, NaN or infinite, or if the collapse index falls
    /// outside the vector.
    pub fn normalize(&mut self, routing: RoutingMode) {
        assert!(
            self.weights.iter().all(|&w| w >= 0.0),
            "gene weights must be non-negative, got {:?}",
            self.weights
        );

        assert!(
            self.weights.iter().all(|w| w.is_finite()),
            "gene weights must be finite, got {:?}",
            self.weights
        );

        let max = self.weights.iter().copied().fold(0.0, f64::max);
        if max == 0.0 {
            self.collapse(0);
            return;
        }

        // Scaling by the largest weight first keeps the sum finite
        for w in self.weights.iter_mut() {
            *w /= max;
        }

        let sum: f64 = self.weights.iter().sum();
        for w in self.weights.iter_mut() {
            *w /= sum;
        }

        if routing.is_single_path() {
            let mean: f64 = self
                .weights
                .iter()
                .enumerate()
                .map(|(i, w)| i as f64 * w)
                .sum();
            let index = mean.round_ties_even();
            assert!(
                index >= 0.0 && (index as usize) < self.weights.len(),
                "single-path collapse index {index} out of bounds for {} paths",
                self.weights.len()
            );

            self.collapse(index as usize);
        }
    }

    /// Index of the path carrying all traffic, if the gene is one-hot.
    pub fn chosen_path(&self) -> Option<usize> {
        let mut chosen = None;
        for (i, &w) in self.weights.iter().enumerate() {
            if w == 1.0 && chosen.is_none() {
                chosen = Some(i);
            } else if w != 0.0 {
                return None;
            }
        }
        chosen
    }

    /// Adds this gene's share of `demand` to the per-link totals in `loads`.
    pub(crate) fn add_capacity_per_link(&self, demand: &Demand, loads: &mut [f64]) {
        for (path, &weight) in demand.paths().iter().zip(self.weights.iter()) {
            if weight == 0.0 {
                continue;
            }

            let flow = demand.value() * weight;
            for link in path.links() {
                loads[link.index()] += flow;
            }
        }
    }

    /// Capacity this gene requires on each link, indexed by link position.
    pub fn capacity_per_link(&self, demand: &Demand, link_count: usize) -> Vec<f64> {
        assert_eq!(
            self.weights.len(),
            demand.path_count(),
            "gene length does not match demand '{}'",
            demand.name()
        );

        let mut loads = vec![0.0; link_count];
        self.add_capacity_per_link(demand, &mut loads);
        loads
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    fn collapse(&mut self, index: usize) {
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = if i == index { 1.0 } else { 0.0 };
        }
    }
}
