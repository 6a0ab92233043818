mod chromosome;
mod crossover;
mod description;
mod gene;
mod history;
mod mode;
mod modularity;
mod mutagen;
mod objective;
mod report;
mod selector;
mod settings;
mod succession;
mod topology;

#[cfg(test)]
pub(crate) mod fixtures;

pub use chromosome::Chromosome;
pub use crossover::{Crossover, CrossoverChance, ProbabilityOutOfRangeError};
pub use description::{
    DemandDescription, LinkDescription, ModuleOption, NodeDescription, TopologyDescription,
};
pub use gene::Gene;
pub use history::History;
pub use mode::{ParseModeError, RoutingMode};
pub use modularity::{Modularity, ModularityOutOfRange};
pub use mutagen::{MUTATION_WEIGHT_RANGE, MutationRate, MutationRateOutOfRange};
pub use objective::{CostBreakdown, SHORTFALL_PENALTY};
pub use report::{DemandPlan, DemandRouting, LinkPlan, PathFlow, Report, Solution};
pub use selector::{SelectionError, Selector};
pub use settings::{Settings, SettingsError};
pub use succession::Succession;
pub use topology::{
    Demand, DemandId, Link, LinkId, Node, Path, Topology, TopologyBuilder, TopologyError,
};
