//! Distress Diffusion Simulator
//!
//! Builds a social network from ego files, perturbs it once, then runs the
//! distress / app-adoption diffusion for a fixed number of steps, rendering
//! every step and writing the summary series for plotting.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use distress_core::output::{renderer_for, write_series, RenderFormat, SERIES_CSV, SERIES_JSON};
use distress_core::setup::read_ego_files;
use distress_core::{AllocationPolicy, SimConfig, SimError, Simulation};

/// Default log filter when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "distress_core=info,distress_sim=info";

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "distress_sim")]
#[command(about = "Distress and app-adoption diffusion over a social network")]
struct Args {
    /// Ego files in `<anchor>: <neighbors>` format, merged into one graph
    #[arg(required_unless_present = "dump_config")]
    inputs: Vec<PathBuf>,

    /// TOML tuning file (defaults to ./tuning.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of steps to simulate
    #[arg(long)]
    iterations: Option<usize>,

    /// Which ids receive a state record
    #[arg(long, value_enum)]
    allocation: Option<AllocationPolicy>,

    /// Per-step artifact format
    #[arg(long, value_enum, default_value_t = RenderFormat::Json)]
    render: RenderFormat,

    /// Directory for step artifacts (under `draw/`) and series files
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolves the configuration: file, then command line overrides.
fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::load_or_default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(iterations) = args.iterations {
        config.simulation.iterations = iterations;
    }
    if let Some(allocation) = args.allocation {
        config.simulation.allocation = allocation;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), SimError> {
    let config = load_config(&args)?;

    if args.dump_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    tracing::info!(
        seed = config.simulation.seed,
        iterations = config.simulation.iterations,
        inputs = args.inputs.len(),
        "Distress diffusion simulator"
    );

    let sources = read_ego_files(&args.inputs)?;
    let mut simulation = Simulation::from_sources(&sources, &config)?;

    let draw_dir = args.output_dir.join("draw");
    let mut renderer = renderer_for(args.render, &draw_dir);
    let report = simulation.run(renderer.as_mut());

    // Unlike step renders, a failed series write fails the run.
    write_series(&report, &args.output_dir).map_err(|source| SimError::Io {
        path: args.output_dir.clone(),
        source,
    })?;
    tracing::info!(
        dir = %args.output_dir.display(),
        peak_distress = report.peak_distress(),
        peak_users = report.peak_users(),
        "Wrote {} and {}",
        SERIES_JSON,
        SERIES_CSV
    );
    Ok(())
}
