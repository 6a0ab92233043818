use super::ParseModeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Policy composing the next population from the previous one and the new children.
///
/// Both policies are elitist: the best chromosome of the previous population is
/// carried over unchanged into slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Succession {
    /// Pools the previous population (minus the kept best) with the children and keeps
    /// the best `N - 1` of the pool.
    #[serde(alias = "best")]
    ElitistMerge,
    /// Pits the previous rank-`i` chromosome against child `i` and keeps the better
    /// one; the previous chromosome wins ties.
    #[serde(alias = "tourny")]
    ElitistTournament,
}

impl Succession {
    /// Builds the next population.
    ///
    /// `survivors` is the previous population without the kept best, sorted best
    /// first. `children` holds one child per non-elite slot. `score` returns the
    /// objective value (lower is better).
    ///
    /// # Panics
    ///
    /// If `children` does not provide exactly one child per slot, or if the
    /// resulting population is not `survivors.len() + 1` long.
    #[instrument(level = "debug", skip_all, fields(succession = ?self, survivors = survivors.len(), children = children.len()))]
    pub(crate) fn apply<T, F>(&self, best: T, survivors: Vec<T>, children: Vec<T>, score: F) -> Vec<T>
    where
        F: Fn(&T) -> f64,
    {
        let population_size = survivors.len() + 1;
        assert_eq!(
            children.len(),
            survivors.len(),
            "succession requires one child per non-elite slot"
        );

        let mut next = Vec::with_capacity(population_size);
        next.push(best);

        match self {
            Self::ElitistMerge => {
                let mut pool = survivors;
                pool.extend(children);
                // Stable sort: on equal scores survivors precede children
                pool.sort_by(|a, b| score(a).total_cmp(&score(b)));
                pool.truncate(population_size - 1);
                next.extend(pool);
            }
            Self::ElitistTournament => {
                for (old, child) in survivors.into_iter().zip(children) {
                    if score(&child) < score(&old) {
                        next.push(child);
                    } else {
                        next.push(old);
                    }
                }
            }
        }

        assert_eq!(
            next.len(),
            population_size,
            "population size drifted during succession"
        );
        next
    }
}

impl FromStr for Succession {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elitist-merge" | "best" => Ok(Self::ElitistMerge),
            "elitist-tournament" | "tourny" => Ok(Self::ElitistTournament),
            _ => Err(ParseModeError::new(
                "succession",
                s,
                "elitist-merge, elitist-tournament",
            )),
        }
    }
}
