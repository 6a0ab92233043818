use anyhow::Result;
use netcap_ga::{
    Evolution,
    evolution::State,
    models::{
        Chromosome, Crossover, CrossoverChance, DemandRouting, MutationRate, RoutingMode,
        Selector, Settings, Succession, Topology, TopologyDescription,
    },
};
use rand::{SeedableRng, rngs::StdRng};

const POLSKA: &str = include_str!("../demos/polska.json");

fn topology() -> Result<Topology> {
    let description: TopologyDescription = serde_json::from_str(POLSKA)?;
    Ok(Topology::from_description(description)?)
}

/// Keeps only the first, smallest module type of every link, so traffic needs
/// several modules per link and plans differ in cost.
fn small_module_topology() -> Result<Topology> {
    let mut description: TopologyDescription = serde_json::from_str(POLSKA)?;
    for link in &mut description.links {
        link.modules.truncate(1);
    }
    Ok(Topology::from_description(description)?)
}

fn settings(succession: Succession, routing: RoutingMode) -> Result<Settings> {
    Ok(Settings::new(
        10,
        5,
        MutationRate::new(0.1)?,
        CrossoverChance::new(0.5)?,
        Crossover::Average,
        Selector::Exponential,
        succession,
        routing,
        2024,
    )?)
}

#[test]
fn test_fixture_rounds_modules_for_a_seeded_chromosome() -> Result<()> {
    let topology = small_module_topology()?;
    let mut rng = StdRng::seed_from_u64(2024);

    let chromosome = Chromosome::random(&mut rng, &topology, RoutingMode::Splitting);
    assert_eq!(chromosome.modules_per_link(true), vec![3.0, 2.0, 2.0, 2.0]);
    assert_eq!(chromosome.objective(), 1316.0);

    Ok(())
}

#[test]
fn test_fixture_large_modules_fit_all_traffic_on_one_module() -> Result<()> {
    let topology = topology()?;
    let mut rng = StdRng::seed_from_u64(2024);

    let chromosome = Chromosome::random(&mut rng, &topology, RoutingMode::Splitting);
    assert_eq!(chromosome.modules_per_link(true), vec![1.0, 1.0, 1.0, 1.0]);
    assert_eq!(chromosome.objective(), 4.0 * 468.0);

    Ok(())
}

#[test]
fn test_fixture_evolution_never_regresses() -> Result<()> {
    let topology = small_module_topology()?;

    for succession in [Succession::ElitistMerge, Succession::ElitistTournament] {
        for routing in [RoutingMode::SinglePath, RoutingMode::Splitting] {
            let mut evolution = Evolution::new(&topology, settings(succession, routing)?)?;

            let initial_best = evolution.best().score();

            evolution.run()?;

            assert_eq!(evolution.state(), State::Finished);
            assert_eq!(evolution.population().len(), 10);

            let costs = evolution.history().costs();
            assert_eq!(costs.len(), 5);
            assert!(costs.windows(2).all(|w| w[1] <= w[0]), "{costs:?}");
            assert!(costs[0] <= initial_best);
            assert!(costs[4] <= costs[0]);
            assert_eq!(costs.last(), Some(&evolution.best().score()));
        }
    }

    Ok(())
}

#[test]
fn test_fixture_report_names_every_demand() -> Result<()> {
    let topology = small_module_topology()?;
    let mut evolution = Evolution::new(
        &topology,
        settings(Succession::ElitistMerge, RoutingMode::SinglePath)?,
    )?;
    evolution.run()?;

    let report = evolution.report();
    assert_eq!(report.epochs_run, 5);
    assert_eq!(report.cost_history, evolution.history().costs());
    assert_eq!(report.cost_history.last(), Some(&report.best.objective));
    assert_eq!(report.best.links.len(), 4);

    let demands: Vec<&str> = report.best.demands.iter().map(|d| d.demand.as_str()).collect();
    assert_eq!(demands, vec!["Demand_0_1", "Demand_0_2", "Demand_0_3"]);

    for plan in &report.best.demands {
        match &plan.routing {
            DemandRouting::Single { path, .. } => assert!(!path.is_empty()),
            other => panic!("expected single-path routing, got {other:?}"),
        }
    }

    let installed: u64 = report.best.links.iter().map(|l| l.modules).sum();
    assert!(installed >= 1);

    Ok(())
}
