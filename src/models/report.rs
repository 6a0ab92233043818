use super::CostBreakdown;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A capacity plan in provider terms: names instead of indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub objective: f64,
    pub cost: CostBreakdown,
    pub links: Vec<LinkPlan>,
    pub demands: Vec<DemandPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkPlan {
    pub link: String,
    pub modules: u64,
    pub module_capacity: f64,
    /// Traffic routed over the link.
    pub required_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandPlan {
    pub demand: String,
    pub routing: DemandRouting,
}

/// How one demand's traffic is carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DemandRouting {
    /// All traffic on one path.
    Single { path: Vec<String>, value: f64 },
    /// Traffic spread over every path with a non-zero share.
    Split { flows: Vec<PathFlow> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathFlow {
    pub path: Vec<String>,
    pub value: f64,
}

/// Summary of an evolution run, ready to be serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub epochs_run: usize,
    pub best: Solution,
    pub cost_history: Vec<f64>,
    pub stagnation_history: Vec<usize>,
}
