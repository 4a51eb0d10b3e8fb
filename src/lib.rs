pub mod config;
pub mod error;
pub mod fire;
pub mod forest;
pub mod grid;
pub mod report;
pub mod rng;

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use config::Config;
use error::Result;
use fire::FireSimulator;
use forest::{Counts, Forest};
use report::Frame;

/// What was actually set up from a config, after ignitions were filtered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Setup {
    pub height: usize,
    pub width: usize,
    pub ignitions: usize,
    pub out_of_range: usize,
    pub propagation_probability: f32,
}

/// Build a simulator from a config. Out-of-range ignitions are dropped and
/// counted; negative dimensions fail.
pub fn prepare(config: &Config, seed: u64) -> Result<(FireSimulator, Setup)> {
    let (ignitions, out_of_range) = config.partition_ignitions();
    let forest = Forest::new(config.height, config.width, &ignitions)?;
    let sim = FireSimulator::new(forest, config.propagation_probability, seed);
    let setup = Setup {
        height: sim.forest().height(),
        width: sim.forest().width(),
        ignitions: ignitions.len(),
        out_of_range,
        propagation_probability: sim.probability(),
    };
    info!(
        height = setup.height,
        width = setup.width,
        ignitions = setup.ignitions,
        out_of_range,
        seed,
        "simulation prepared"
    );
    Ok((sim, setup))
}

/// Complete record of one run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub setup: Setup,
    pub seed: u64,
    pub steps: usize,
    pub final_counts: Counts,
    pub burned_percentage: f64,
    pub frames: Vec<Frame>,
    pub elapsed_ms: f64,
}

/// Run a config to completion. With `keep_frames` every state is captured,
/// otherwise only the final one.
pub fn simulate(config: &Config, seed: u64, keep_frames: bool) -> Result<RunReport> {
    let start = Instant::now();
    let (mut sim, setup) = prepare(config, seed)?;

    let mut frames = Vec::new();
    let steps = sim.run(|step, forest| {
        if keep_frames || forest.is_fire_out() {
            frames.push(Frame::capture(step, forest));
        }
    });

    let final_counts = sim.counts();
    let burned_percentage = report::burned_percentage(&final_counts);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(steps, burned_percentage, elapsed_ms, "fire out");

    Ok(RunReport {
        setup,
        seed,
        steps,
        final_counts,
        burned_percentage,
        frames,
        elapsed_ms,
    })
}
