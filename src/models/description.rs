use super::{Modularity, Topology, TopologyError};
use serde::Deserialize;
use tracing::instrument;

/// Name-keyed topology as a provider hands it over, typically as JSON.
///
/// ```rust
/// use netcap_ga::models::{Topology, TopologyDescription};
///
/// let description: TopologyDescription = serde_json::from_str(r#"{
///     "modularity": 1.0,
///     "nodes": [
///         { "name": "A", "longitude": 0.0, "latitude": 0.0 },
///         { "name": "B", "longitude": 1.0, "latitude": 1.0 }
///     ],
///     "links": [
///         { "name": "AB", "source": "A", "target": "B",
///           "modules": [{ "capacity": 10.0, "cost": 2.0 }, { "capacity": 40.0, "cost": 5.0 }] }
///     ],
///     "demands": [
///         { "name": "D", "source": "A", "target": "B", "value": 12.0, "paths": [["AB"]] }
///     ]
/// }"#)?;
///
/// let topology = Topology::from_description(description)?;
/// assert_eq!(topology.links()[0].module_capacity(), 40.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TopologyDescription {
    pub modularity: Modularity,
    pub nodes: Vec<NodeDescription>,
    pub links: Vec<LinkDescription>,
    pub demands: Vec<DemandDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDescription {
    pub name: String,
    pub source: String,
    pub target: String,
    /// Module types the link can carry. The last one listed is installed.
    pub modules: Vec<ModuleOption>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModuleOption {
    pub capacity: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemandDescription {
    pub name: String,
    pub source: String,
    pub target: String,
    pub value: f64,
    #[serde(default)]
    pub max_path_length: Option<usize>,
    /// Candidate paths as link names in travel order.
    pub paths: Vec<Vec<String>>,
}

impl Topology {
    /// Resolves and validates a provider description.
    #[instrument(level = "debug", skip(description), fields(links = description.links.len(), demands = description.demands.len()))]
    pub fn from_description(description: TopologyDescription) -> Result<Self, TopologyError> {
        let mut builder = Topology::builder(description.modularity);

        for node in &description.nodes {
            builder = builder.node(&node.name, node.longitude, node.latitude);
        }

        for link in &description.links {
            let module = link
                .modules
                .last()
                .ok_or_else(|| TopologyError::NoModules(link.name.clone()))?;
            builder = builder.link(&link.name, &link.source, &link.target, module.capacity, module.cost);
        }

        for demand in description.demands {
            builder = builder.demand(
                &demand.name,
                &demand.source,
                &demand.target,
                demand.value,
                demand.max_path_length,
                demand.paths,
            );
        }

        builder.build()
    }
}
