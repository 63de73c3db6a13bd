//! CSV output backends.
//!
//! - [`CsvResultLogger`]: one row per run, appended to a results file that
//!   survives across sweeps.
//! - [`CsvTraceWriter`]: `trace.csv`, one row per tick of a single run.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use log::{debug, warn};

use ix_core::RunId;

use crate::writer::{ResultSink, SeenIds, TraceWriter};
use crate::{OutputError, OutputResult, ResultRow, TraceRow};

/// Column order of the results file.
pub const RESULT_COLUMNS: [&str; 24] = [
    "run_id",
    "timestamp",
    "length",
    "vmax",
    "t_green",
    "injection_rate",
    "p_b",
    "p_chg",
    "p_red",
    "p_skid",
    "lane_changing",
    "weather",
    "metrics_start_step",
    "seed",
    "steps",
    "n_lateral",
    "n_rear_end",
    "n_vehicles",
    "throughput",
    "completed_vehicles",
    "avg_travel_time",
    "avg_speed",
    "lateral_to_rear_end_ratio",
    "time",
];

/// Column order of `trace.csv`.
pub const TRACE_COLUMNS: [&str; 11] = [
    "tick",
    "r1_light",
    "r2_light",
    "active",
    "injected",
    "lane_changes",
    "entrants_r1",
    "entrants_r2",
    "lateral",
    "rear_end",
    "completed",
];

// ── Results ───────────────────────────────────────────────────────────────────

/// Append-only results table deduplicated by `run_id`.
///
/// Opening an existing file reads the identifiers already present; the header
/// is only written when the file is new or empty.
pub struct CsvResultLogger {
    path:   PathBuf,
    writer: Writer<File>,
    seen:   SeenIds,
}

impl CsvResultLogger {
    pub fn open(path: &Path) -> OutputResult<Self> {
        let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        let seen = if is_new { SeenIds::default() } else { read_run_ids(path)? };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(RESULT_COLUMNS)?;
            writer.flush()?;
        } else {
            debug!("{}: resuming with {} existing runs", path.display(), seen.len());
        }

        Ok(Self { path: path.to_path_buf(), writer, seen })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct runs in the file.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_run_ids(path: &Path) -> OutputResult<SeenIds> {
    let mut reader = csv::Reader::from_path(path)?;
    let column = reader
        .headers()?
        .iter()
        .position(|h| h == "run_id")
        .ok_or_else(|| OutputError::MissingRunId { path: path.display().to_string() })?;

    let mut seen = SeenIds::default();
    for record in reader.records() {
        let record = record?;
        match record.get(column).map(str::parse::<u32>) {
            Some(Ok(id)) => {
                seen.insert(RunId(id));
            }
            _ => warn!("{}: ignoring row with unreadable run_id", path.display()),
        }
    }
    Ok(seen)
}

impl ResultSink for CsvResultLogger {
    fn log(&mut self, row: &ResultRow) -> OutputResult<bool> {
        if !self.seen.insert(row.run_id) {
            warn!("{}: run {} already logged, skipping", self.path.display(), row.run_id.0);
            return Ok(false);
        }
        self.writer.write_record(&[
            row.run_id.0.to_string(),
            row.timestamp.to_string(),
            row.length.to_string(),
            row.vmax.to_string(),
            row.t_green.to_string(),
            row.injection_rate.to_string(),
            row.p_b.to_string(),
            row.p_chg.to_string(),
            row.p_red.to_string(),
            row.p_skid.to_string(),
            row.lane_changing.to_string(),
            row.weather.as_str().to_string(),
            row.metrics_start_step.to_string(),
            row.seed.to_string(),
            row.steps.to_string(),
            row.n_lateral.to_string(),
            row.n_rear_end.to_string(),
            row.n_vehicles.to_string(),
            row.throughput.to_string(),
            row.completed_vehicles.to_string(),
            row.avg_travel_time.to_string(),
            row.avg_speed.to_string(),
            row.lateral_to_rear_end_ratio.to_string(),
            row.time.to_string(),
        ])?;
        // One row per run: flush so an interrupted sweep keeps what finished.
        self.writer.flush()?;
        Ok(true)
    }

    fn contains(&self, run_id: RunId) -> bool {
        self.seen.contains(run_id)
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

// ── Trace ─────────────────────────────────────────────────────────────────────

/// Writes `trace.csv` into a directory.
pub struct CsvTraceWriter {
    writer:   Writer<File>,
    finished: bool,
}

impl CsvTraceWriter {
    /// Create (truncating) `dir/trace.csv` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut writer = Writer::from_path(dir.join("trace.csv"))?;
        writer.write_record(TRACE_COLUMNS)?;
        Ok(Self { writer, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_tick(&mut self, row: &TraceRow) -> OutputResult<()> {
        self.writer.write_record(&[
            row.tick.to_string(),
            row.r1_light.as_str().to_string(),
            row.r2_light.as_str().to_string(),
            row.active.to_string(),
            row.injected.map(|id| id.to_string()).unwrap_or_default(),
            row.lane_changes.to_string(),
            row.entrants_r1.to_string(),
            row.entrants_r2.to_string(),
            (row.lateral as u8).to_string(),
            row.rear_end.to_string(),
            row.completed.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
