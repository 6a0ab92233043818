use super::{
    Crossover, CrossoverChance, MutationRate, MutationRateOutOfRange,
    ProbabilityOutOfRangeError, RoutingMode, Selector, Succession,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Everything an evolution run is configured with.
///
/// There are no defaults: every value is passed explicitly, either to
/// [`Settings::new`] or in the JSON read by [`Settings::from_json`].
///
/// ```rust
/// use netcap_ga::models::Settings;
///
/// let settings = Settings::from_json(r#"{
///     "population_size": 20,
///     "epochs": 50,
///     "mutation_rate": 0.1,
///     "crossover_chance": 0.7,
///     "crossover": "average",
///     "selector": "exp",
///     "succession": "tourny",
///     "routing": "splitting",
///     "seed": 7
/// }"#)?;
///
/// assert_eq!(settings.population_size(), 20);
/// assert_eq!(settings.stagnation_limit(), None);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    population_size: usize,
    epochs: usize,
    mutation_rate: MutationRate,
    crossover_chance: CrossoverChance,
    crossover: Crossover,
    selector: Selector,
    succession: Succession,
    routing: RoutingMode,
    seed: u64,
    #[serde(default)]
    stagnation_limit: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("population_size must be at least 1")]
    ZeroPopulation,
    #[error("epochs must be at least 1")]
    ZeroEpochs,
    #[error("stagnation_limit must be at least 1")]
    ZeroStagnationLimit,
    #[error("MutationRate: {0}")]
    MutationRate(#[from] MutationRateOutOfRange),
    #[error("CrossoverChance: {0}")]
    CrossoverChance(#[from] ProbabilityOutOfRangeError),
    #[error("Could not parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl Settings {
    #[instrument(level = "debug", skip_all, fields(population_size = population_size, epochs = epochs, routing = ?routing))]
    pub fn new(
        population_size: usize,
        epochs: usize,
        mutation_rate: MutationRate,
        crossover_chance: CrossoverChance,
        crossover: Crossover,
        selector: Selector,
        succession: Succession,
        routing: RoutingMode,
        seed: u64,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            population_size,
            epochs,
            mutation_rate,
            crossover_chance,
            crossover,
            selector,
            succession,
            routing,
            seed,
            stagnation_limit: None,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Deserializes and validates settings in one step.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Stops the run early once the best score has stayed put for `limit` epochs.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Result<Self, SettingsError> {
        self.stagnation_limit = Some(limit);
        self.validate()?;
        Ok(self)
    }

    pub(crate) fn validate(&self) -> Result<(), SettingsError> {
        if self.population_size == 0 {
            return Err(SettingsError::ZeroPopulation);
        }

        if self.epochs == 0 {
            return Err(SettingsError::ZeroEpochs);
        }

        if self.stagnation_limit == Some(0) {
            return Err(SettingsError::ZeroStagnationLimit);
        }

        Ok(())
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn mutation_rate(&self) -> MutationRate {
        self.mutation_rate
    }

    pub fn crossover_chance(&self) -> CrossoverChance {
        self.crossover_chance
    }

    pub fn crossover(&self) -> Crossover {
        self.crossover
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn succession(&self) -> Succession {
        self.succession
    }

    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stagnation_limit(&self) -> Option<usize> {
        self.stagnation_limit
    }
}
