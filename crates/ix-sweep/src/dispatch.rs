//! Running many independent simulations in parallel.
//!
//! Each run owns its simulation outright, so workers share nothing.  Rows
//! travel back over a channel and reach the [`ResultSink`] on the calling
//! thread, in completion order.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use ix_core::RunId;
use ix_output::{ResultRow, ResultSink};
use ix_sim::SimBuilder;

use crate::{RunConfig, SweepError, SweepResult};

/// Build, run and snapshot one configuration.
pub fn run_single(run: &RunConfig) -> SweepResult<ResultRow> {
    let mut sim = SimBuilder::new(run.config.clone(), run.params.clone()).build()?;
    sim.run(run.steps);
    Ok(ResultRow::from_run(run.run_id, &sim.run_params(), &sim.metrics()))
}

/// A run that produced no row.
#[derive(Debug)]
pub struct SweepFailure {
    pub run_id: RunId,
    pub error:  SweepError,
}

/// Outcome of [`Dispatcher::run`].
#[derive(Debug, Default)]
pub struct SweepSummary {
    /// Rows accepted by the sink.
    pub rows:     usize,
    /// Runs skipped because the sink already held their id.
    pub skipped:  usize,
    pub failures: Vec<SweepFailure>,
    pub elapsed:  Duration,
}

impl SweepSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parallel sweep executor with its own worker pool.
pub struct Dispatcher {
    pool: ThreadPool,
}

impl Dispatcher {
    /// `max_workers = None` uses one worker per logical CPU.
    pub fn new(max_workers: Option<usize>) -> SweepResult<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("ix-sweep-{i}"));
        if let Some(n) = max_workers {
            builder = builder.num_threads(n);
        }
        Ok(Self { pool: builder.build()? })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Execute every configuration with [`run_single`], forwarding rows to
    /// `sink`.  A failed or panicking run is recorded and never aborts the
    /// sweep.
    pub fn run<S: ResultSink>(&self, configs: Vec<RunConfig>, sink: &mut S) -> SweepSummary {
        self.run_with(configs, sink, run_single)
    }

    /// [`run`](Self::run) with a custom per-run function.
    pub fn run_with<S, F>(&self, configs: Vec<RunConfig>, sink: &mut S, runner: F) -> SweepSummary
    where
        S: ResultSink,
        F: Fn(&RunConfig) -> SweepResult<ResultRow> + Sync,
    {
        let started = Instant::now();
        let (pending, done): (Vec<_>, Vec<_>) =
            configs.into_iter().partition(|c| !sink.contains(c.run_id));

        let mut summary = SweepSummary { skipped: done.len(), ..SweepSummary::default() };
        let total = pending.len();
        info!(
            "sweep: {total} runs on {} workers ({} already recorded)",
            self.workers(),
            summary.skipped,
        );

        let (tx, rx) = mpsc::channel::<(RunId, SweepResult<ResultRow>)>();
        let pool = &self.pool;
        let runner = &runner;
        thread::scope(|scope| {
            scope.spawn(move || {
                pool.install(|| {
                    pending.par_iter().for_each_with(tx, |tx, run| {
                        // The receiver only hangs up if the caller is unwinding.
                        let _ = tx.send((run.run_id, run_isolated(run, runner)));
                    });
                });
            });

            for (finished, (run_id, outcome)) in rx.iter().enumerate() {
                let finished = finished + 1;
                match outcome.and_then(|row| sink.log(&row).map_err(SweepError::from)) {
                    Ok(true) => summary.rows += 1,
                    Ok(false) => summary.skipped += 1,
                    Err(error) => {
                        warn!("run {} failed: {error}", run_id.0);
                        summary.failures.push(SweepFailure { run_id, error });
                    }
                }

                let elapsed = started.elapsed().as_secs_f64();
                let eta = elapsed / finished as f64 * (total - finished) as f64;
                info!("[{finished}/{total}] run {} | elapsed {elapsed:.1}s | ETA {eta:.1}s", run_id.0);
            }
        });

        if let Err(e) = sink.finish() {
            warn!("result sink failed to flush: {e}");
        }
        summary.elapsed = started.elapsed();
        info!(
            "sweep finished in {:.2}s: {} rows, {} skipped, {} failed",
            summary.elapsed.as_secs_f64(),
            summary.rows,
            summary.skipped,
            summary.failures.len(),
        );
        summary
    }
}

fn run_isolated<F>(run: &RunConfig, runner: &F) -> SweepResult<ResultRow>
where
    F: Fn(&RunConfig) -> SweepResult<ResultRow>,
{
    panic::catch_unwind(AssertUnwindSafe(|| runner(run))).unwrap_or_else(|payload| {
        Err(SweepError::Panicked { run_id: run.run_id, message: panic_message(payload.as_ref()) })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
