//! Four-city sample network shared by the unit tests.

use super::{Modularity, Topology};

pub(crate) fn polska() -> Topology {
    polska_with(Modularity::new(1.0).unwrap())
}

pub(crate) fn polska_with(modularity: Modularity) -> Topology {
    polska_links(
        modularity,
        [(622.0, 468.0), (622.0, 468.0), (622.0, 468.0), (622.0, 468.0)],
    )
}

/// The same network on the smaller module types, so several modules per link are
/// needed and plans differ in cost.
pub(crate) fn polska_small_modules() -> Topology {
    polska_links(
        Modularity::new(1.0).unwrap(),
        [(155.0, 156.0), (155.0, 156.0), (131.0, 156.0), (155.0, 112.0)],
    )
}

fn polska_links(modularity: Modularity, modules: [(f64, f64); 4]) -> Topology {
    Topology::builder(modularity)
        .node("Gdansk", 18.60, 54.20)
        .node("Szczecin", 14.50, 53.40)
        .node("Warsaw", 21.00, 52.20)
        .node("Wroclaw", 16.90, 51.10)
        .link("Link_0_1", "Gdansk", "Warsaw", modules[0].0, modules[0].1)
        .link("Link_0_2", "Gdansk", "Szczecin", modules[1].0, modules[1].1)
        .link("Link_2_3", "Szczecin", "Wroclaw", modules[2].0, modules[2].1)
        .link("Link_3_1", "Wroclaw", "Warsaw", modules[3].0, modules[3].1)
        .demand(
            "Demand_0_1",
            "Gdansk",
            "Warsaw",
            195.0,
            None,
            [
                vec!["Link_0_1"],
                vec!["Link_0_2", "Link_2_3", "Link_3_1"],
            ],
        )
        .demand(
            "Demand_0_2",
            "Gdansk",
            "Wroclaw",
            158.0,
            None,
            [vec!["Link_0_1", "Link_3_1"], vec!["Link_0_2", "Link_2_3"]],
        )
        .demand(
            "Demand_0_3",
            "Gdansk",
            "Szczecin",
            174.0,
            None,
            [
                vec!["Link_0_2"],
                vec!["Link_0_1", "Link_3_1", "Link_2_3"],
            ],
        )
        .build()
        .unwrap()
}
