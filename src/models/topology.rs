use super::Modularity;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

/// Position of a link in the topology's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkId(usize);

impl LinkId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a demand in the topology's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DemandId(usize);

impl DemandId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    longitude: f64,
    latitude: f64,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

/// An undirected connection between two nodes, grown in whole modules.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    name: String,
    source: String,
    target: String,
    module_capacity: f64,
    module_cost: f64,
}

impl Link {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Capacity added by each installed module.
    pub fn module_capacity(&self) -> f64 {
        self.module_capacity
    }

    pub fn module_cost(&self) -> f64 {
        self.module_cost
    }
}

/// An ordered sequence of links connecting a demand's source to its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    links: Vec<LinkId>,
}

impl Path {
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Traffic that must be carried between two nodes over one or more candidate paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Demand {
    name: String,
    source: String,
    target: String,
    value: f64,
    max_path_length: Option<usize>,
    paths: Vec<Path>,
}

impl Demand {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// `None` when the demand places no bound on path length.
    pub fn max_path_length(&self) -> Option<usize> {
        self.max_path_length
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TopologyError {
    #[error("DuplicateNode: node '{0}' is declared more than once")]
    DuplicateNode(String),
    #[error("DuplicateLink: link '{0}' is declared more than once")]
    DuplicateLink(String),
    #[error("DuplicateDemand: demand '{0}' is declared more than once")]
    DuplicateDemand(String),
    #[error("UnknownNode: '{owner}' references undeclared node '{node}'")]
    UnknownNode { owner: String, node: String },
    #[error("UnknownLink: demand '{demand}' references undeclared link '{link}'")]
    UnknownLink { demand: String, link: String },
    #[error("InvalidModuleCapacity: link '{link}' must have a finite module capacity > 0, got {capacity}")]
    InvalidModuleCapacity { link: String, capacity: f64 },
    #[error("InvalidModuleCost: link '{link}' must have a finite module cost >= 0, got {cost}")]
    InvalidModuleCost { link: String, cost: f64 },
    #[error("NoModules: link '{0}' offers no module options")]
    NoModules(String),
    #[error("InvalidDemandValue: demand '{demand}' must have a finite value >= 0, got {value}")]
    InvalidDemandValue { demand: String, value: f64 },
    #[error("NoCandidatePaths: demand '{0}' has no candidate paths to route over")]
    NoCandidatePaths(String),
    #[error("EmptyPath: demand '{demand}' has an empty candidate path at position {path}")]
    EmptyPath { demand: String, path: usize },
    #[error("PathTooLong: demand '{demand}' path {path} has {length} links, max is {max}")]
    PathTooLong {
        demand: String,
        path: usize,
        length: usize,
        max: usize,
    },
    #[error(
        "DisconnectedPath: demand '{demand}' path {path} is not a simple walk from '{from}' to '{to}'"
    )]
    DisconnectedPath {
        demand: String,
        path: usize,
        from: String,
        to: String,
    },
}

/// Immutable network scenario shared by every chromosome of a run.
///
/// Nodes, links and demands keep their declaration order; that order is what
/// [`LinkId`] and [`DemandId`] index into and what horizontal-slice crossover
/// splits over.
#[derive(Debug)]
pub struct Topology {
    nodes: Vec<Node>,
    links: Vec<Link>,
    demands: Vec<Demand>,
    node_index: HashMap<String, usize>,
    link_index: HashMap<String, LinkId>,
    demand_index: HashMap<String, DemandId>,
    modularity: Modularity,
}

impl Topology {
    pub fn builder(modularity: Modularity) -> TopologyBuilder {
        TopologyBuilder {
            modularity,
            nodes: Vec::new(),
            links: Vec::new(),
            demands: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    pub fn link_id(&self, name: &str) -> Option<LinkId> {
        self.link_index.get(name).copied()
    }

    pub fn demand(&self, id: DemandId) -> &Demand {
        &self.demands[id.0]
    }

    pub fn demand_id(&self, name: &str) -> Option<DemandId> {
        self.demand_index.get(name).copied()
    }

    pub fn modularity(&self) -> Modularity {
        self.modularity
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn demand_count(&self) -> usize {
        self.demands.len()
    }
}

struct DemandEntry {
    name: String,
    source: String,
    target: String,
    value: f64,
    max_path_length: Option<usize>,
    paths: Vec<Vec<String>>,
}

/// Collects the provider's name-keyed data and resolves it into a [`Topology`].
pub struct TopologyBuilder {
    modularity: Modularity,
    nodes: Vec<Node>,
    links: Vec<Link>,
    demands: Vec<DemandEntry>,
}

impl TopologyBuilder {
    pub fn node(mut self, name: &str, longitude: f64, latitude: f64) -> Self {
        self.nodes.push(Node {
            name: name.to_string(),
            longitude,
            latitude,
        });
        self
    }

    pub fn link(
        mut self,
        name: &str,
        source: &str,
        target: &str,
        module_capacity: f64,
        module_cost: f64,
    ) -> Self {
        self.links.push(Link {
            name: name.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            module_capacity,
            module_cost,
        });
        self
    }

    /// Adds a demand whose candidate paths are given as link names in travel order.
    pub fn demand<P, L>(
        mut self,
        name: &str,
        source: &str,
        target: &str,
        value: f64,
        max_path_length: Option<usize>,
        paths: P,
    ) -> Self
    where
        P: IntoIterator<Item = L>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|path| {
                path.into_iter()
                    .map(|link| link.as_ref().to_string())
                    .collect()
            })
            .collect();

        self.demands.push(DemandEntry {
            name: name.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            value,
            max_path_length,
            paths,
        });
        self
    }

    #[instrument(level = "debug", skip(self), fields(nodes = self.nodes.len(), links = self.links.len(), demands = self.demands.len()))]
    pub fn build(self) -> Result<Topology, TopologyError> {
        let mut node_index = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if node_index.insert(node.name.clone(), i).is_some() {
                return Err(TopologyError::DuplicateNode(node.name.clone()));
            }
        }

        let mut link_index = HashMap::with_capacity(self.links.len());
        for (i, link) in self.links.iter().enumerate() {
            validate_link(link, &node_index)?;
            if link_index.insert(link.name.clone(), LinkId(i)).is_some() {
                return Err(TopologyError::DuplicateLink(link.name.clone()));
            }
        }

        let mut demand_index = HashMap::with_capacity(self.demands.len());
        let mut demands = Vec::with_capacity(self.demands.len());
        for (i, entry) in self.demands.into_iter().enumerate() {
            let demand = resolve_demand(entry, &node_index, &link_index, &self.links)?;
            if demand_index
                .insert(demand.name.clone(), DemandId(i))
                .is_some()
            {
                return Err(TopologyError::DuplicateDemand(demand.name));
            }
            demands.push(demand);
        }

        Ok(Topology {
            nodes: self.nodes,
            links: self.links,
            demands,
            node_index,
            link_index,
            demand_index,
            modularity: self.modularity,
        })
    }
}

fn validate_link(link: &Link, nodes: &HashMap<String, usize>) -> Result<(), TopologyError> {
    for endpoint in [&link.source, &link.target] {
        if !nodes.contains_key(endpoint) {
            return Err(TopologyError::UnknownNode {
                owner: link.name.clone(),
                node: endpoint.clone(),
            });
        }
    }

    if !(link.module_capacity.is_finite() && link.module_capacity > 0.0) {
        return Err(TopologyError::InvalidModuleCapacity {
            link: link.name.clone(),
            capacity: link.module_capacity,
        });
    }

    if !(link.module_cost.is_finite() && link.module_cost >= 0.0) {
        return Err(TopologyError::InvalidModuleCost {
            link: link.name.clone(),
            cost: link.module_cost,
        });
    }

    Ok(())
}

fn resolve_demand(
    entry: DemandEntry,
    nodes: &HashMap<String, usize>,
    link_index: &HashMap<String, LinkId>,
    links: &[Link],
) -> Result<Demand, TopologyError> {
    for endpoint in [&entry.source, &entry.target] {
        if !nodes.contains_key(endpoint) {
            return Err(TopologyError::UnknownNode {
                owner: entry.name.clone(),
                node: endpoint.clone(),
            });
        }
    }

    if !(entry.value.is_finite() && entry.value >= 0.0) {
        return Err(TopologyError::InvalidDemandValue {
            demand: entry.name,
            value: entry.value,
        });
    }

    if entry.paths.is_empty() {
        return Err(TopologyError::NoCandidatePaths(entry.name));
    }

    let mut paths = Vec::with_capacity(entry.paths.len());
    for (position, names) in entry.paths.iter().enumerate() {
        if names.is_empty() {
            return Err(TopologyError::EmptyPath {
                demand: entry.name,
                path: position,
            });
        }

        if let Some(max) = entry.max_path_length {
            if names.len() > max {
                return Err(TopologyError::PathTooLong {
                    demand: entry.name,
                    path: position,
                    length: names.len(),
                    max,
                });
            }
        }

        let ids = names
            .iter()
            .map(|name| {
                link_index
                    .get(name)
                    .copied()
                    .ok_or_else(|| TopologyError::UnknownLink {
                        demand: entry.name.clone(),
                        link: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !is_simple_walk(&ids, links, &entry.source, &entry.target) {
            return Err(TopologyError::DisconnectedPath {
                demand: entry.name,
                path: position,
                from: entry.source,
                to: entry.target,
            });
        }

        paths.push(Path { links: ids });
    }

    Ok(Demand {
        name: entry.name,
        source: entry.source,
        target: entry.target,
        value: entry.value,
        max_path_length: entry.max_path_length,
        paths,
    })
}

/// Links are undirected, so each hop may be traversed from either endpoint.
fn is_simple_walk(path: &[LinkId], links: &[Link], source: &str, target: &str) -> bool {
    let mut visited = HashSet::with_capacity(path.len() + 1);
    let mut current = source;
    visited.insert(current);

    for id in path {
        let link = &links[id.0];
        current = if link.source == current {
            link.target.as_str()
        } else if link.target == current {
            link.source.as_str()
        } else {
            return false;
        };

        if !visited.insert(current) {
            return false;
        }
    }

    current == target
}
