use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wildfire::config::Config;
use wildfire::report;
use wildfire::rng::seed_from_clock;

/// Probabilistic wildfire spread on a rectangular grid.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (HEIGHT, WIDTH, BURNING_CELL, PROPAGATION_PROBABILITY).
    #[arg(default_value = "config.txt")]
    config: PathBuf,

    /// RNG seed. Taken from the clock once at startup when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the whole run as one JSON document instead of text frames.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wildfire=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(seed_from_clock);

    let (config, _warnings) = Config::load(&args.config)?;

    if args.json {
        let run = wildfire::simulate(&config, seed, true)
            .with_context(|| format!("simulating {}", args.config.display()))?;
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    let (mut sim, setup) = wildfire::prepare(&config, seed)
        .with_context(|| format!("setting up {}", args.config.display()))?;
    print!("{}", report::header(&setup));

    sim.run(|step, forest| {
        if forest.is_fire_out() {
            println!("Step {step}: fire out!");
        } else {
            println!("Step {step}:");
        }
        println!("{}", report::render(forest));
        println!("{}", report::status_line(&forest.counts()));
        println!();
    });

    println!("Simulation complete. The forest fire is out.");
    Ok(())
}
