use super::{Gene, ParseModeError, RoutingMode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Elementwise mean of both parents' weights.
fn crossover_average(lhs: &Gene, rhs: &Gene, routing: RoutingMode) -> Gene {
    let weights = lhs
        .weights()
        .iter()
        .zip(rhs.weights().iter())
        .map(|(a, b)| (a + b) / 2.0)
        .collect();
    Gene::from_weights(weights, routing)
}

/// Weights before `point` from `lhs`, the rest from `rhs`.
fn crossover_vertical_slice(lhs: &Gene, rhs: &Gene, point: usize, routing: RoutingMode) -> Gene {
    let mut weights = Vec::with_capacity(lhs.len());

    weights.extend_from_slice(&lhs.weights()[..point]); // Head from lhs
    weights.extend_from_slice(&rhs.weights()[point..]); // Tail from rhs
    Gene::from_weights(weights, routing)
}

/// Whole genes before `point` from `lhs`, the rest from `rhs`.
fn crossover_horizontal_slice(lhs: &[Gene], rhs: &[Gene], point: usize) -> Vec<Gene> {
    let mut genes = Vec::with_capacity(lhs.len());

    genes.extend_from_slice(&lhs[..point]);
    genes.extend_from_slice(&rhs[point..]);
    genes
}

/// Recombination operator producing one child from two parents.
///
/// # Strategies
///
/// ## Average
/// Every gene of the child is the per-path mean of both parents' weights. The child
/// sits between its parents and tends to spread traffic over more paths.
///
/// ## Vertical slice
/// For every gene independently, a split index `s` is drawn from `0..=len`. The
/// child takes the first `s` weights from the first parent and the rest from the
/// second, then renormalizes.
///
/// ## Horizontal slice
/// One split index is drawn over the demands in topology order. The child takes
/// whole genes from the first parent before it and from the second parent after
/// it. Genes are copied unchanged, so no renormalization happens.
///
/// # Examples
///
/// ```rust
/// use netcap_ga::models::Crossover;
///
/// let crossover: Crossover = "vertical-slice".parse()?;
/// assert_eq!(crossover, Crossover::VerticalSlice);
///
/// assert!("uniform".parse::<Crossover>().is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Crossover {
    Average,
    VerticalSlice,
    HorizontalSlice,
}

impl Crossover {
    /// Builds the child's genes from two parents' genes, in demand order.
    ///
    /// Parents are read only; every returned gene owns a fresh weight vector.
    #[instrument(level = "debug", skip(rng, lhs, rhs), fields(genes = lhs.len()))]
    pub(crate) fn apply<R: Rng>(
        &self,
        rng: &mut R,
        lhs: &[Gene],
        rhs: &[Gene],
        routing: RoutingMode,
    ) -> Vec<Gene> {
        match self {
            Self::Average => lhs
                .iter()
                .zip(rhs.iter())
                .map(|(a, b)| crossover_average(a, b, routing))
                .collect(),
            Self::VerticalSlice => lhs
                .iter()
                .zip(rhs.iter())
                .map(|(a, b)| {
                    let point = rng.random_range(0..=a.len()); // Split per gene
                    crossover_vertical_slice(a, b, point, routing)
                })
                .collect(),
            Self::HorizontalSlice => {
                let point = rng.random_range(0..=lhs.len()); // One split over demands
                crossover_horizontal_slice(lhs, rhs, point)
            }
        }
    }
}

impl FromStr for Crossover {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(Self::Average),
            "vertical-slice" => Ok(Self::VerticalSlice),
            "horizontal-slice" => Ok(Self::HorizontalSlice),
            _ => Err(ParseModeError::new(
                "crossover",
                s,
                "average, vertical-slice, horizontal-slice",
            )),
        }
    }
}

/// Probability that a new child is bred by crossover rather than copied from one parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CrossoverChance(f64);

/// Error returned when attempting to create a crossover chance outside `[0.0, 1.0]`.
///
/// ```rust
/// use netcap_ga::models::CrossoverChance;
///
/// assert!(CrossoverChance::new(-0.1).is_err());
/// assert!(CrossoverChance::new(1.5).is_err());
/// assert!(CrossoverChance::new(0.5).is_ok());
/// ```
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("crossover chance must be between 0.0 and 1.0, got {0}")]
pub struct ProbabilityOutOfRangeError(f64);

impl CrossoverChance {
    pub fn new(probability: f64) -> Result<Self, ProbabilityOutOfRangeError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ProbabilityOutOfRangeError(probability));
        }

        Ok(Self(probability))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for CrossoverChance {
    type Error = ProbabilityOutOfRangeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CrossoverChance> for f64 {
    fn from(chance: CrossoverChance) -> Self {
        chance.0
    }
}
