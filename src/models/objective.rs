use super::{Link, Modularity};
use serde::Serialize;

/// Cost charged per unit of capacity a link is short of its required capacity.
///
/// Large enough that any undersupplied plan costs more than any fully supplied one
/// on realistic topologies.
pub const SHORTFALL_PENALTY: f64 = 1e4;

/// The three terms of the objective function. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// `SHORTFALL_PENALTY` times the capacity missing across all links.
    pub shortfall: f64,
    /// Cost of every installed module.
    pub installation: f64,
    /// Cost of the modules needed to fill each link up to the next multiple of the
    /// modularity factor.
    pub modularity_waste: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.shortfall + self.installation + self.modularity_waste
    }
}

/// Prices a capacity plan given per-link required capacity and installed module counts.
pub(crate) fn evaluate(
    links: &[Link],
    modularity: Modularity,
    required: &[f64],
    modules: &[f64],
) -> CostBreakdown {
    let mut cost = CostBreakdown {
        shortfall: 0.0,
        installation: 0.0,
        modularity_waste: 0.0,
    };

    for ((link, &required), &modules) in links.iter().zip(required).zip(modules) {
        let installed = modules * link.module_capacity();
        let shortfall = (required - installed).max(0.0);

        cost.shortfall += shortfall * SHORTFALL_PENALTY;
        cost.installation += modules * link.module_cost();
        cost.modularity_waste += modularity.waste(modules) * link.module_cost();
    }

    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    fn unit() -> Modularity {
        Modularity::new(1.0).unwrap()
    }

    #[test]
    fn it_prices_installed_modules() {
        let topology = fixtures::polska();
        let cost = evaluate(
            topology.links(),
            unit(),
            &[600.0, 0.0, 700.0, 10.0],
            &[1.0, 0.0, 2.0, 1.0],
        );

        assert_eq!(cost.shortfall, 0.0);
        assert_eq!(cost.installation, 4.0 * 468.0);
        assert_eq!(cost.modularity_waste, 0.0);
        assert_eq!(cost.total(), 1872.0);
    }

    #[test]
    fn it_penalizes_undersupplied_links() {
        let topology = fixtures::polska();
        // Link_0_1 needs 700 but carries a single 622 module
        let cost = evaluate(
            topology.links(),
            unit(),
            &[700.0, 0.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0, 0.0],
        );

        assert_eq!(cost.shortfall, 78.0 * SHORTFALL_PENALTY);
        assert!(cost.total() > 4.0 * 468.0 * 10.0);
    }

    #[test]
    fn it_charges_modularity_waste() {
        let topology = fixtures::polska();
        let cost = evaluate(
            topology.links(),
            Modularity::new(2.0).unwrap(),
            &[600.0, 0.0, 700.0, 10.0],
            &[1.0, 0.0, 2.0, 1.0],
        );

        // Link_0_1 and Link_3_1 each need one more module to reach a pair
        assert_eq!(cost.modularity_waste, 2.0 * 468.0);
    }
}
