//! sweep: run a parameter grid over the intersection model in parallel and
//! append one row per run to a results CSV.
//!
//! ```text
//! cargo run --release -p sweep -- --grid grid.json --output results.csv --workers 8
//! ```
//!
//! Re-running with the same grid and output file only executes the runs that
//! are not in the file yet.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use ix_core::Weather;
use ix_output::CsvResultLogger;
use ix_sweep::{Dispatcher, ParameterGrid};

#[derive(Parser)]
#[command(name = "sweep")]
#[command(about = "Parallel parameter sweep over the NaSch intersection model")]
struct Cli {
    /// JSON parameter grid; missing fields take single default values
    #[arg(long)]
    grid: Option<PathBuf>,

    /// Results file, appended to and deduplicated by run_id
    #[arg(long, default_value = "simulation_results.csv")]
    output: PathBuf,

    /// Worker threads (default: one per logical CPU)
    #[arg(long)]
    workers: Option<usize>,

    /// Override the grid's step count
    #[arg(long)]
    steps: Option<u64>,

    /// Use the rainy probability preset when no grid file is given
    #[arg(long)]
    rainy: bool,

    /// Print the expanded run list and exit
    #[arg(long)]
    dry_run: bool,
}

fn load_grid(cli: &Cli) -> Result<ParameterGrid> {
    let mut grid = match &cli.grid {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading grid file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing grid file {}", path.display()))?
        }
        None if cli.rainy => ParameterGrid::for_weather(Weather::Rainy),
        None => ParameterGrid::default(),
    };
    if let Some(steps) = cli.steps {
        grid.steps = steps;
    }
    Ok(grid)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let grid = load_grid(&cli)?;
    let configs = grid.configs();
    if configs.is_empty() {
        bail!("parameter grid has an empty value list");
    }

    if cli.dry_run {
        for run in &configs {
            println!(
                "{:>5}  L={:<4} vmax={:<2} t_green={:<4} rate={:<5} p_b={:<5} p_chg={:<5} p_red={:<6} p_skid={:<5} seed={}",
                run.run_id.0,
                run.config.length,
                run.config.v_max,
                run.config.t_green,
                run.config.injection_rate,
                run.params.p_b,
                run.params.p_chg,
                run.params.p_red,
                run.params.p_skid,
                run.config.seed,
            );
        }
        return Ok(());
    }

    let mut logger = CsvResultLogger::open(&cli.output)
        .with_context(|| format!("opening results file {}", cli.output.display()))?;
    let dispatcher = Dispatcher::new(cli.workers)?;
    info!(
        "{} runs x {} steps, {} workers, results → {}",
        configs.len(),
        grid.steps,
        dispatcher.workers(),
        cli.output.display(),
    );

    let summary = dispatcher.run(configs, &mut logger);

    println!("─────────────────────────────────────────────");
    println!("Rows written   : {}", summary.rows);
    println!("Already present: {}", summary.skipped);
    println!("Failed         : {}", summary.failures.len());
    println!("Wall time      : {:.2} s", summary.elapsed.as_secs_f64());
    println!("Results        : {}", cli.output.display());

    for failure in &summary.failures {
        eprintln!("run {}: {}", failure.run_id.0, failure.error);
    }
    if !summary.is_clean() {
        bail!("{} of the runs failed", summary.failures.len());
    }
    Ok(())
}
