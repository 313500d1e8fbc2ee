//! Run one arbitration strategy over the kinematic reference engine and
//! write trip/step CSVs.
//!
//! ```text
//! crossing --strategy grid --steps 30000 --out-dir out/grid
//! RUST_LOG=debug crossing --strategy right-of-way
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use aim_control::{ControlConfig, ControlResult, StrategyKind};
use aim_core::RunConfig;
use aim_engine::{EngineParams, KinematicEngine};
use aim_output::TripObserver;
use aim_sim::Runner;

fn parse_strategy(s: &str) -> ControlResult<StrategyKind> {
    s.parse()
}

#[derive(Parser, Debug)]
#[command(version, about = "Single-intersection arbitration demo")]
struct Cli {
    /// Arbitration strategy: fifo, right-of-way, phase, or grid (or 0-3).
    #[arg(short, long, default_value = "fifo", value_parser = parse_strategy)]
    strategy: StrategyKind,

    /// Number of simulation steps.
    #[arg(long, default_value_t = 3_000)]
    steps: u64,

    /// Simulated seconds per step.
    #[arg(long, default_value_t = 0.1)]
    step_length: f64,

    /// Per-step probability of a new vehicle arriving.
    #[arg(long, default_value_t = 0.026)]
    spawn_probability: f64,

    /// RNG seed; identical seeds reproduce identical runs.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Directory for trips.csv and steps.csv.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let run_config = RunConfig {
        total_steps:       cli.steps,
        step_secs:         cli.step_length,
        seed:              cli.seed,
        spawn_probability: cli.spawn_probability,
        ..RunConfig::default()
    };
    let control_config = ControlConfig {
        step_secs: cli.step_length,
        ..ControlConfig::default()
    };
    let engine = KinematicEngine::new(EngineParams {
        step_secs: cli.step_length,
        ..EngineParams::default()
    });

    let (observer, stats) = TripObserver::create(&cli.out_dir, cli.step_length)
        .with_context(|| format!("opening output files under {}", cli.out_dir.display()))?;

    let mut runner = Runner::builder(engine)
        .run_config(run_config)
        .control_config(control_config)
        .strategy(cli.strategy)
        .observer(Box::new(observer))
        .build()
        .context("assembling the run")?;

    let summary = runner.run().context("run failed")?;
    if let Some(e) = stats.take_error() {
        return Err(e).context("writing run output");
    }

    println!("strategy:   {}", cli.strategy);
    println!("steps:      {}", summary.steps);
    println!("spawned:    {}", summary.spawned);
    println!("departed:   {}", summary.departed);
    println!("remaining:  {}", summary.remaining);
    match stats.mean_travel_secs() {
        Some(mean) => println!("mean trip:  {mean:.1} s"),
        None => println!("mean trip:  n/a (no completed trips)"),
    }
    println!("output:     {}", cli.out_dir.display());
    Ok(())
}
