//! # Capacity Planning Example
//!
//! Plans link capacity for a four-city network. Every demand has two candidate
//! paths and every link installs 622-unit modules.
//!
//! Run with `cargo run --example plan_fixture`. The settings can be overridden by
//! passing a JSON file as the first argument.

use anyhow::Result;
use netcap_ga::{
    Evolution,
    models::{Settings, Topology, TopologyDescription},
};
use std::env;

const POLSKA: &str = include_str!("polska.json");

const SETTINGS: &str = r#"{
    "population_size": 30,
    "epochs": 40,
    "mutation_rate": 0.1,
    "crossover_chance": 0.6,
    "crossover": "vertical-slice",
    "selector": "exponential",
    "succession": "elitist-merge",
    "routing": "splitting",
    "seed": 7,
    "stagnation_limit": 15
}"#;

fn main() -> Result<()> {
    // Initialize logging to see per-epoch progress
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let settings = match env::args().nth(1) {
        Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
        None => Settings::from_json(SETTINGS)?,
    };

    let description: TopologyDescription = serde_json::from_str(POLSKA)?;
    let topology = Topology::from_description(description)?;

    let mut evolution = Evolution::new(&topology, settings)?;
    let best = evolution.run()?;
    tracing::info!(cost = best.score(), "Best plan found");

    println!("{}", serde_json::to_string_pretty(&evolution.report())?);

    Ok(())
}
