use super::objective::{self, CostBreakdown};
use super::{
    Crossover, DemandPlan, DemandRouting, Gene, LinkPlan, Modularity, MutationRate, Path,
    PathFlow, RoutingMode, Solution, Topology, mutagen,
};
use rand::Rng;
use tracing::instrument;

/// A candidate routing for every demand of a topology.
///
/// The chromosome borrows its topology; cloning copies the genes and shares the
/// topology. Genes are indexed by demand position, so `genes()[i]` belongs to
/// `topology().demands()[i]`.
#[derive(Debug, Clone)]
pub struct Chromosome<'a> {
    topology: &'a Topology,
    genes: Vec<Gene>,
    routing: RoutingMode,
    modularity: Modularity,
}

impl<'a> Chromosome<'a> {
    /// One random gene per demand.
    #[instrument(level = "debug", skip(rng, topology), fields(demands = topology.demand_count()))]
    pub fn random<R: Rng>(rng: &mut R, topology: &'a Topology, routing: RoutingMode) -> Self {
        let genes = topology
            .demands()
            .iter()
            .map(|demand| Gene::random(rng, demand.path_count(), routing))
            .collect();

        Self::assemble(topology, routing, genes)
    }

    /// Builds a chromosome from explicit genes, renormalized under `routing`.
    ///
    /// # Panics
    ///
    /// If there is not exactly one gene per demand, or a gene's length differs from
    /// its demand's number of candidate paths.
    pub fn from_genes(topology: &'a Topology, routing: RoutingMode, mut genes: Vec<Gene>) -> Self {
        for gene in genes.iter_mut() {
            gene.normalize(routing);
        }

        Self::assemble(topology, routing, genes)
    }

    fn assemble(topology: &'a Topology, routing: RoutingMode, genes: Vec<Gene>) -> Self {
        let chromosome = Self {
            topology,
            genes,
            routing,
            modularity: topology.modularity(),
        };
        chromosome.assert_shape();
        chromosome
    }

    fn assert_shape(&self) {
        assert_eq!(
            self.genes.len(),
            self.topology.demand_count(),
            "chromosome must hold one gene per demand"
        );

        for (gene, demand) in self.genes.iter().zip(self.topology.demands()) {
            assert_eq!(
                gene.len(),
                demand.path_count(),
                "gene length does not match demand '{}'",
                demand.name()
            );
        }
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    pub fn modularity(&self) -> Modularity {
        self.modularity
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// The gene of the demand called `name`.
    pub fn gene(&self, name: &str) -> Option<&Gene> {
        self.topology
            .demand_id(name)
            .map(|id| &self.genes[id.index()])
    }

    /// Traffic routed over every link, summed over all demands.
    pub fn total_link_capacity(&self) -> Vec<f64> {
        let mut loads = vec![0.0; self.topology.link_count()];
        for (gene, demand) in self.genes.iter().zip(self.topology.demands()) {
            gene.add_capacity_per_link(demand, &mut loads);
        }
        loads
    }

    /// Modules needed on every link to carry its traffic.
    ///
    /// With `round_up` false the ratio is left fractional.
    pub fn modules_per_link(&self, round_up: bool) -> Vec<f64> {
        self.total_link_capacity()
            .into_iter()
            .zip(self.topology.links())
            .map(|(load, link)| {
                let modules = load / link.module_capacity();
                if round_up { modules.ceil() } else { modules }
            })
            .collect()
    }

    /// Installed capacity left over on every link once its traffic is carried.
    pub fn demand_slack_per_link(&self) -> Vec<f64> {
        self.total_link_capacity()
            .into_iter()
            .zip(self.modules_per_link(true))
            .zip(self.topology.links())
            .map(|((load, modules), link)| modules * link.module_capacity() - load)
            .collect()
    }

    pub fn cost_breakdown(&self) -> CostBreakdown {
        let required = self.total_link_capacity();
        let modules = self.modules_per_link(true);

        objective::evaluate(self.topology.links(), self.modularity, &required, &modules)
    }

    /// Cost of the plan this chromosome encodes. Lower is better.
    pub fn objective(&self) -> f64 {
        self.cost_breakdown().total()
    }

    /// Independently, with probability `rate`, redraws one weight of every gene.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, rate: MutationRate) {
        let routing = self.routing;
        for gene in self.genes.iter_mut() {
            if rng.random_bool(rate.value()) {
                mutagen::redraw_weight(rng, gene, routing);
            }
        }
    }

    /// Breeds one child from two parents. Neither parent is modified.
    ///
    /// # Panics
    ///
    /// If the parents do not share the same topology and routing mode.
    pub fn reproduce<R: Rng>(
        rng: &mut R,
        lhs: &Chromosome<'a>,
        rhs: &Chromosome<'a>,
        crossover: Crossover,
    ) -> Chromosome<'a> {
        assert!(
            std::ptr::eq(lhs.topology, rhs.topology),
            "parents must share one topology"
        );
        assert_eq!(lhs.routing, rhs.routing, "parents must share one routing mode");
        lhs.assert_shape();
        rhs.assert_shape();

        let genes = crossover.apply(rng, &lhs.genes, &rhs.genes, lhs.routing);
        Self::assemble(lhs.topology, lhs.routing, genes)
    }

    /// The plan in provider terms.
    pub fn solution(&self) -> Solution {
        let cost = self.cost_breakdown();
        let required = self.total_link_capacity();
        let modules = self.modules_per_link(true);

        let links = self
            .topology
            .links()
            .iter()
            .zip(required)
            .zip(modules)
            .map(|((link, load), modules)| LinkPlan {
                link: link.name().to_string(),
                modules: modules as u64,
                module_capacity: link.module_capacity(),
                required_capacity: load,
            })
            .collect();

        let demands = self
            .genes
            .iter()
            .zip(self.topology.demands())
            .map(|(gene, demand)| {
                let routing = match self.routing {
                    RoutingMode::SinglePath => {
                        let Some(index) = gene.chosen_path() else {
                            panic!("single-path gene for demand '{}' is not one-hot", demand.name());
                        };
                        DemandRouting::Single {
                            path: self.link_names(&demand.paths()[index]),
                            value: demand.value(),
                        }
                    }
                    RoutingMode::Splitting => DemandRouting::Split {
                        flows: demand
                            .paths()
                            .iter()
                            .zip(gene.weights())
                            .filter(|(_, w)| **w > 0.0)
                            .map(|(path, w)| PathFlow {
                                path: self.link_names(path),
                                value: demand.value() * w,
                            })
                            .collect(),
                    },
                };

                DemandPlan {
                    demand: demand.name().to_string(),
                    routing,
                }
            })
            .collect();

        Solution {
            objective: cost.total(),
            cost,
            links,
            demands,
        }
    }

    fn link_names(&self, path: &Path) -> Vec<String> {
        path.links()
            .iter()
            .map(|&id| self.topology.link(id).name().to_string())
            .collect()
    }
}
