use super::Error;
use crate::models::{Chromosome, History, Report, Settings, Topology};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use tracing::instrument;
use uuid::Uuid;

/// A chromosome together with its objective value.
#[derive(Debug, Clone)]
pub struct Scored<'a> {
    chromosome: Chromosome<'a>,
    score: f64,
}

impl<'a> Scored<'a> {
    pub fn chromosome(&self) -> &Chromosome<'a> {
        &self.chromosome
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The initial population exists and no epoch has run yet.
    Initialized,
    /// `epoch` is the zero-based index of the next epoch to run.
    Running { epoch: usize },
    Finished,
}

/// Scores every chromosome in parallel, keeping input order.
fn score_all(chromosomes: Vec<Chromosome<'_>>) -> Vec<Scored<'_>> {
    let scores: Vec<f64> = chromosomes.par_iter().map(Chromosome::objective).collect();

    chromosomes
        .into_iter()
        .zip(scores)
        .map(|(chromosome, score)| Scored { chromosome, score })
        .collect()
}

/// Stable ascending sort: equal scores keep their population order.
fn rank(population: &mut [Scored<'_>]) {
    population.sort_by(|a, b| a.score.total_cmp(&b.score));
}

/// Generational search over capacity plans for one topology.
///
/// The engine owns its population and its random source; the topology is borrowed
/// for the whole run and shared by every chromosome. After construction and after
/// every epoch the population is ranked, best first.
///
/// ```rust,no_run
/// use netcap_ga::Evolution;
/// use netcap_ga::models::{Settings, Topology, TopologyDescription};
///
/// # fn load() -> Result<(TopologyDescription, Settings), Box<dyn std::error::Error>> { unimplemented!() }
/// let (description, settings) = load()?;
/// let topology = Topology::from_description(description)?;
///
/// let mut evolution = Evolution::new(&topology, settings)?;
/// let best = evolution.run()?;
/// println!("best plan costs {}", best.score());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Evolution<'a> {
    id: Uuid,
    topology: &'a Topology,
    settings: Settings,
    rng: StdRng,
    population: Vec<Scored<'a>>,
    history: History,
    state: State,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl<'a> Evolution<'a> {
    /// Seeds the random source and builds and ranks a random initial population.
    #[instrument(level = "info", skip_all, fields(population_size = settings.population_size(), routing = ?settings.routing()))]
    pub fn new(topology: &'a Topology, settings: Settings) -> Result<Self, Error> {
        settings.validate()?;

        let id = Uuid::now_v7();
        let mut rng = StdRng::seed_from_u64(settings.seed());

        let chromosomes = (0..settings.population_size())
            .map(|_| Chromosome::random(&mut rng, topology, settings.routing()))
            .collect();
        let mut population = score_all(chromosomes);
        rank(&mut population);

        tracing::info!(
            run_id = %id,
            demands = topology.demand_count(),
            links = topology.link_count(),
            best = population[0].score,
            "Initialized population"
        );

        Ok(Self {
            id,
            topology,
            settings,
            rng,
            population,
            history: History::new(),
            state: State::Initialized,
            started_at: Utc::now(),
            finished_at: None,
        })
    }

    /// Runs one epoch. Returns whether more epochs remain.
    #[instrument(level = "debug", skip(self), fields(run_id = %self.id))]
    pub fn step(&mut self) -> Result<bool, Error> {
        let epoch = match self.state {
            State::Initialized => 0,
            State::Running { epoch } => epoch,
            State::Finished => return Err(Error::Finished),
        };

        let children = score_all(self.breed()?);

        // Slot 0 of a ranked population is the elite
        let mut survivors = std::mem::take(&mut self.population);
        let elite = survivors.remove(0);

        self.population =
            self.settings
                .succession()
                .apply(elite, survivors, children, Scored::score);
        rank(&mut self.population);

        let best = self.population[0].score;
        let stagnation = self.history.record(best);
        tracing::info!(epoch, best, stagnation, "Epoch finished");

        let next = epoch + 1;
        let stagnated = self
            .settings
            .stagnation_limit()
            .is_some_and(|limit| stagnation >= limit);

        if next >= self.settings.epochs() {
            self.finish();
        } else if stagnated {
            tracing::warn!(
                epoch,
                stagnation,
                "Best score stagnated, stopping before the configured epoch count"
            );
            self.finish();
        } else {
            self.state = State::Running { epoch: next };
        }

        Ok(self.state != State::Finished)
    }

    /// Steps until the run finishes and returns the best chromosome found.
    pub fn run(&mut self) -> Result<&Scored<'a>, Error> {
        while self.step()? {}
        Ok(self.best())
    }

    /// Builds one child per non-elite slot.
    fn breed(&mut self) -> Result<Vec<Chromosome<'a>>, Error> {
        let slots = self.settings.population_size() - 1;
        let chance = self.settings.crossover_chance().value();

        let crossovers: Vec<bool> = (0..slots).map(|_| self.rng.random_bool(chance)).collect();
        let draws = crossovers.iter().map(|&c| if c { 2 } else { 1 }).sum();
        let parents = self
            .settings
            .selector()
            .select(&mut self.rng, self.population.len(), draws)?;

        tracing::debug!(
            slots,
            crossovers = crossovers.iter().filter(|&&c| c).count(),
            draws,
            "Selected parents"
        );

        let mut children = Vec::with_capacity(slots);
        let mut cursor = 0;
        for crossover in crossovers {
            let mut child = if crossover {
                let lhs = &self.population[parents[cursor]].chromosome;
                let rhs = &self.population[parents[cursor + 1]].chromosome;
                cursor += 2;
                Chromosome::reproduce(&mut self.rng, lhs, rhs, self.settings.crossover())
            } else {
                let parent = &self.population[parents[cursor]].chromosome;
                cursor += 1;
                parent.clone()
            };

            child.mutate(&mut self.rng, self.settings.mutation_rate());
            children.push(child);
        }

        Ok(children)
    }

    fn finish(&mut self) {
        self.state = State::Finished;
        self.finished_at = Some(Utc::now());

        tracing::info!(
            run_id = %self.id,
            epochs = self.history.len(),
            best = self.best().score,
            "Evolution finished"
        );
    }

    /// The best-ranked chromosome of the current population.
    pub fn best(&self) -> &Scored<'a> {
        &self.population[0]
    }

    /// The current population, best first.
    pub fn population(&self) -> &[Scored<'a>] {
        &self.population
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Everything the result exporter needs, as of now.
    pub fn report(&self) -> Report {
        Report {
            run_id: self.id,
            started_at: self.started_at,
            finished_at: self.finished_at,
            epochs_run: self.history.len(),
            best: self.best().chromosome.solution(),
            cost_history: self.history.costs().to_vec(),
            stagnation_history: self.history.stagnation().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Crossover, CrossoverChance, MutationRate, RoutingMode, Selector, SettingsError,
        Succession, fixtures,
    };

    fn settings(
        population_size: usize,
        epochs: usize,
        selector: Selector,
        succession: Succession,
        routing: RoutingMode,
    ) -> Settings {
        Settings::new(
            population_size,
            epochs,
            MutationRate::new(0.2).unwrap(),
            CrossoverChance::new(0.6).unwrap(),
            Crossover::VerticalSlice,
            selector,
            succession,
            routing,
            42,
        )
        .unwrap()
    }

    fn all_modes() -> Vec<(Selector, Succession, RoutingMode)> {
        let mut modes = Vec::new();
        for selector in [Selector::Uniform, Selector::Exponential] {
            for succession in [Succession::ElitistMerge, Succession::ElitistTournament] {
                for routing in [RoutingMode::SinglePath, RoutingMode::Splitting] {
                    modes.push((selector, succession, routing));
                }
            }
        }
        modes
    }

    #[test]
    fn it_keeps_population_size_and_never_loses_the_best() {
        let topology = fixtures::polska();

        for (selector, succession, routing) in all_modes() {
            let settings = settings(8, 10, selector, succession, routing);
            let mut evolution = Evolution::new(&topology, settings).unwrap();

            while evolution.step().unwrap() {
                assert_eq!(evolution.population().len(), 8);
            }

            let costs = evolution.history().costs();
            assert_eq!(costs.len(), 10);
            assert!(costs.windows(2).all(|w| w[1] <= w[0]), "{costs:?}");
            assert_eq!(costs.last(), Some(&evolution.best().score()));
        }
    }

    #[test]
    fn it_records_the_best_of_every_finished_epoch() {
        let topology = fixtures::polska_small_modules();

        for seed in 0..40 {
            let settings = Settings::new(
                10,
                3,
                MutationRate::new(0.2).unwrap(),
                CrossoverChance::new(0.6).unwrap(),
                Crossover::Average,
                Selector::Exponential,
                Succession::ElitistMerge,
                RoutingMode::Splitting,
                seed,
            )
            .unwrap();
            let mut evolution = Evolution::new(&topology, settings).unwrap();
            let initial = evolution.best().score();

            while evolution.step().unwrap() {
                assert_eq!(
                    evolution.history().costs().last(),
                    Some(&evolution.best().score())
                );
            }

            let report = evolution.report();
            assert_eq!(report.cost_history.last(), Some(&report.best.objective));
            assert!(report.cost_history[0] <= initial);
        }
    }

    #[test]
    fn it_keeps_population_ranked() {
        let topology = fixtures::polska();
        let settings = settings(
            6,
            3,
            Selector::Exponential,
            Succession::ElitistTournament,
            RoutingMode::Splitting,
        );
        let mut evolution = Evolution::new(&topology, settings).unwrap();
        evolution.run().unwrap();

        let scores: Vec<f64> = evolution.population().iter().map(Scored::score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        for scored in evolution.population() {
            assert_eq!(scored.score(), scored.chromosome().objective());
        }
    }

    #[test]
    fn it_reproduces_runs_from_the_same_seed() {
        let topology = fixtures::polska();
        let run = || {
            let settings = settings(
                10,
                5,
                Selector::Exponential,
                Succession::ElitistMerge,
                RoutingMode::Splitting,
            );
            let mut evolution = Evolution::new(&topology, settings).unwrap();
            evolution.run().unwrap();
            (
                evolution.history().clone(),
                evolution.best().chromosome().genes().to_vec(),
            )
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn it_walks_through_states() {
        let topology = fixtures::polska();
        let settings = settings(
            4,
            2,
            Selector::Uniform,
            Succession::ElitistMerge,
            RoutingMode::SinglePath,
        );
        let mut evolution = Evolution::new(&topology, settings).unwrap();

        assert_eq!(evolution.state(), State::Initialized);
        assert!(evolution.history().is_empty());

        assert!(evolution.step().unwrap());
        assert_eq!(evolution.state(), State::Running { epoch: 1 });

        assert!(!evolution.step().unwrap());
        assert_eq!(evolution.state(), State::Finished);
        assert!(evolution.finished_at().is_some());

        assert!(matches!(evolution.step(), Err(Error::Finished)));
        assert_eq!(evolution.history().len(), 2);
    }

    #[test]
    fn it_stops_early_once_stagnated() {
        let topology = fixtures::polska();
        // A single chromosome never changes, so the best score is flat from the start
        let settings = settings(
            1,
            100,
            Selector::Exponential,
            Succession::ElitistTournament,
            RoutingMode::Splitting,
        )
        .with_stagnation_limit(3)
        .unwrap();

        let mut evolution = Evolution::new(&topology, settings).unwrap();
        evolution.run().unwrap();

        assert_eq!(evolution.state(), State::Finished);
        assert_eq!(evolution.history().stagnation(), &[0, 1, 2, 3]);
    }

    #[test]
    fn it_runs_single_member_populations() {
        let topology = fixtures::polska();
        let settings = settings(
            1,
            5,
            Selector::Uniform,
            Succession::ElitistMerge,
            RoutingMode::SinglePath,
        );
        let mut evolution = Evolution::new(&topology, settings).unwrap();
        let first = evolution.best().score();

        assert_eq!(evolution.run().unwrap().score(), first);
        assert_eq!(evolution.history().costs(), &[first; 5]);
    }

    #[test]
    fn it_reports_the_run() {
        let topology = fixtures::polska();
        let settings = settings(
            6,
            4,
            Selector::Exponential,
            Succession::ElitistMerge,
            RoutingMode::SinglePath,
        );
        let mut evolution = Evolution::new(&topology, settings).unwrap();
        evolution.run().unwrap();

        let report = evolution.report();
        assert_eq!(report.run_id, evolution.id());
        assert_eq!(report.epochs_run, 4);
        assert_eq!(report.cost_history.len(), 4);
        assert_eq!(report.stagnation_history[0], 0);
        assert_eq!(report.best.objective, evolution.best().score());
        assert_eq!(report.cost_history.last(), Some(&report.best.objective));
        assert_eq!(report.best.demands.len(), 3);
        assert!(report.finished_at.is_some_and(|t| t >= report.started_at));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["best"]["demands"][0]["routing"]["mode"], "single");
    }

    #[test]
    fn it_rejects_settings_that_skipped_validation() {
        let topology = fixtures::polska();
        let settings: Settings = serde_json::from_str(
            r#"{
                "population_size": 0, "epochs": 5, "mutation_rate": 0.1,
                "crossover_chance": 0.5, "crossover": "average", "selector": "uniform",
                "succession": "elitist-merge", "routing": "splitting", "seed": 1
            }"#,
        )
        .unwrap();

        assert!(matches!(
            Evolution::new(&topology, settings),
            Err(Error::SettingsError(SettingsError::ZeroPopulation))
        ));
    }
}
