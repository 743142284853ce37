//! gridshift entry point: CLI wiring and config-driven scheduling run.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gridshift::Error;
use gridshift::catalog::DiscoverResponse;
use gridshift::config::{SchedulerConfig, load_tasks_json};
use gridshift::io::export::{export_placement_csv, export_schedule_csv};
use gridshift::runner::run_schedule;

/// Carbon- and price-aware scheduler for deferrable energy workloads.
#[derive(Debug, Parser)]
#[command(name = "gridshift", version)]
struct Cli {
    /// Discovery response (JSON) holding the energy catalog.
    #[arg(long)]
    catalog: PathBuf,

    /// Load scheduler settings from a TOML config file.
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (baseline, cost_focus).
    #[arg(long)]
    preset: Option<String>,

    /// Task requests (JSON array); replaces the configured tasks.
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Override the refiner's random seed.
    #[arg(long, env = "GRIDSHIFT_SEED")]
    seed: Option<u64>,

    /// Export the initial placement to CSV.
    #[arg(long)]
    placement_out: Option<PathBuf>,

    /// Export the refined schedule to CSV.
    #[arg(long)]
    schedule_out: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<SchedulerConfig, Error> {
    // --config takes priority, then --preset, then baseline default
    let mut config = if let Some(ref path) = cli.config {
        SchedulerConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        SchedulerConfig::from_preset(name)?
    } else {
        SchedulerConfig::baseline()
    };

    if let Some(ref path) = cli.tasks {
        config.tasks = load_tasks_json(path)?;
    }
    if let Some(seed) = cli.seed {
        config.scheduler.seed = seed;
    }

    config.validated()
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = load_config(cli)?;
    let response = DiscoverResponse::from_json_file(&cli.catalog)?;
    info!(
        catalog = %cli.catalog.display(),
        tasks = config.tasks.len(),
        seed = config.scheduler.seed,
        "configuration loaded"
    );

    let run = run_schedule(&config, &response);

    println!("{}", run.placement);
    if !run.selected_items.is_empty() {
        println!("Selected items: {}\n", run.selected_items.join(", "));
    }
    println!("--- Refined Schedule ---");
    for task in &run.refined {
        println!("{task}");
    }
    println!("\n{}", run.report);

    if let Some(ref path) = cli.placement_out {
        export_placement_csv(&run.placement, path)?;
        report_written("Placement", path);
    }
    if let Some(ref path) = cli.schedule_out {
        export_schedule_csv(&run.refined, path)?;
        report_written("Schedule", path);
    }

    Ok(())
}

fn report_written(what: &str, path: &Path) {
    eprintln!("{what} written to {}", path.display());
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
