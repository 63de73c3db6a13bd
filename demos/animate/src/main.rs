//! animate: watch one intersection evolve in the terminal.
//!
//! Steps the model once per frame and redraws all four lanes.  With
//! `--trace DIR` every tick is also written to `DIR/trace.csv`.

use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use ix_core::{IntersectionConfig, ModelParams, Weather};
use ix_output::{CsvTraceWriter, TraceObserver, TraceWriter, render_roads};
use ix_sim::SimBuilder;

#[derive(Parser)]
#[command(name = "animate")]
#[command(about = "Terminal animation of the NaSch intersection model")]
struct Cli {
    /// Road length in cells, excluding the intersection
    #[arg(long, default_value = "60")]
    length: u32,

    #[arg(long, default_value = "5")]
    vmax: u32,

    /// Green period in ticks
    #[arg(long, default_value = "20")]
    t_green: u64,

    /// Per-tick injection probability
    #[arg(long, default_value = "0.3")]
    rate: f64,

    #[arg(long, default_value = "300")]
    frames: u64,

    /// Frames per second; 0 runs as fast as possible
    #[arg(long, default_value = "8")]
    fps: u32,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Use the rainy probability preset
    #[arg(long)]
    rainy: bool,

    /// Disable lane changing
    #[arg(long)]
    no_lane_change: bool,

    /// Directory for trace.csv
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let weather = if cli.rainy { Weather::Rainy } else { Weather::Normal };
    let config = IntersectionConfig {
        length:         cli.length,
        v_max:          cli.vmax,
        t_green:        cli.t_green,
        injection_rate: cli.rate,
        seed:           cli.seed,
        ..IntersectionConfig::default()
    };
    let mut sim = SimBuilder::new(config, ModelParams::for_weather(weather))
        .lane_changing(!cli.no_lane_change)
        .build()?;

    let mut trace = match &cli.trace {
        Some(dir) => Some(
            CsvTraceWriter::new(dir)
                .map(TraceObserver::new)
                .with_context(|| format!("creating trace.csv in {}", dir.display()))?,
        ),
        None => None,
    };

    let frame = if cli.fps == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / f64::from(cli.fps))
    };

    let mut stdout = std::io::stdout().lock();
    for _ in 0..cli.frames {
        match trace.as_mut() {
            Some(observer) => {
                sim.step_observed(observer);
                if let Some(e) = observer.take_error() {
                    warn!("trace disabled: {e}");
                    trace = None;
                }
            }
            None => sim.step(),
        }

        let m = sim.metrics();
        write!(stdout, "\x1b[2J\x1b[H{}", render_roads(&sim))?;
        writeln!(
            stdout,
            "\nactive {:>3}   injected {:>4}   through {:>4}   done {:>4}   lateral {:>3}   rear-end {:>3}",
            sim.active_count(),
            m.n_vehicles,
            m.throughput,
            m.completed_vehicles,
            m.n_lateral,
            m.n_rear_end,
        )?;
        stdout.flush()?;

        if !frame.is_zero() {
            thread::sleep(frame);
        }
    }

    if let Some(observer) = trace {
        let rows = observer.rows();
        observer.into_writer().finish()?;
        writeln!(stdout, "\n{rows} ticks traced")?;
    }

    let m = sim.metrics();
    writeln!(stdout, "\n{:#?}", m)?;
    Ok(())
}
