//! Parent selection over a ranked population.
//!
//! Selection works on ranks, not on raw objective values: rank 0 is the best
//! chromosome of the population. Parents are drawn with replacement, so one
//! chromosome can parent several children in the same epoch.
//!
//! # Selection Methods
//!
//! ## Uniform
//!
//! Every rank is equally likely. There is no selection pressure beyond what
//! succession applies afterwards.
//!
//! ## Exponential
//!
//! Rank `r` is drawn with weight `e^(-r)`. The best chromosome is about 2.7 times
//! as likely to be drawn as the second best, and ranks past ~40 are effectively
//! never drawn.
//!
//! ```rust
//! use netcap_ga::models::Selector;
//!
//! let exponential: Selector = "exponential".parse()?;
//! let legacy: Selector = "exp".parse()?;
//! assert_eq!(exponential, legacy);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::ParseModeError;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Draws `count` ranks uniformly from `0..population`.
fn uniform_selection<R: Rng>(rng: &mut R, population: usize, count: usize) -> Vec<usize> {
    (0..count).map(|_| rng.random_range(0..population)).collect()
}

/// Draws `count` ranks with weight `e^(-rank)`.
fn exponential_selection<R: Rng>(
    rng: &mut R,
    population: usize,
    count: usize,
) -> Result<Vec<usize>, SelectionError> {
    let weights = (0..population).map(|rank| (-(rank as f64)).exp());
    let wheel = WeightedIndex::new(weights)
        .map_err(|e| SelectionError::InvalidWeights(e.to_string()))?;

    Ok((0..count).map(|_| wheel.sample(rng)).collect())
}

/// Parent selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selector {
    /// Every rank equally likely.
    #[serde(alias = "rand")]
    Uniform,
    /// Rank `r` weighted by `e^(-r)`.
    #[serde(alias = "exp")]
    Exponential,
}

/// Errors that can occur during parent selection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Parents were requested from an empty population.
    #[error("No candidates available for selection")]
    EmptyPopulation,

    /// The rank weights could not be turned into a sampling distribution.
    #[error("Invalid rank weights for exponential selection: {0}")]
    InvalidWeights(String),
}

impl Selector {
    /// Draws `count` parent ranks, with replacement, from a population of
    /// `population` chromosomes sorted best first.
    #[instrument(level = "debug", skip(self, rng), fields(method = ?self))]
    pub(crate) fn select<R: Rng>(
        &self,
        rng: &mut R,
        population: usize,
        count: usize,
    ) -> Result<Vec<usize>, SelectionError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        if population == 0 {
            return Err(SelectionError::EmptyPopulation);
        }

        match self {
            Self::Uniform => Ok(uniform_selection(rng, population, count)),
            Self::Exponential => exponential_selection(rng, population, count),
        }
    }
}

impl FromStr for Selector {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" | "rand" => Ok(Self::Uniform),
            "exponential" | "exp" => Ok(Self::Exponential),
            _ => Err(ParseModeError::new("selection", s, "uniform, exponential")),
        }
    }
}
