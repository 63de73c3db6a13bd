//! `ix-output`: result rows, CSV sinks and text rendering for nasch_ix.
//!
//! | Type / fn           | Purpose                                                    |
//! |---------------------|------------------------------------------------------------|
//! | [`ResultRow`]       | One finished run: parameters + metrics + identifier        |
//! | [`CsvResultLogger`] | Append-only results table, deduplicated by `run_id`        |
//! | [`TraceObserver`]   | `SimObserver` writing one [`TraceRow`] per tick            |
//! | [`CsvTraceWriter`]  | `trace.csv` backend for [`TraceObserver`]                  |
//! | [`render_roads`]    | Text picture of all four lanes, for terminals and logs     |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ix_output::{CsvResultLogger, CsvTraceWriter, ResultRow, ResultSink, TraceObserver};
//!
//! let mut obs = TraceObserver::new(CsvTraceWriter::new(Path::new("./out"))?);
//! sim.run_observed(1_000, &mut obs);
//! obs.take_error().map(|e| eprintln!("trace error: {e}"));
//!
//! let mut logger = CsvResultLogger::open(Path::new("results.csv"))?;
//! logger.log(&ResultRow::from_run(0, &sim.run_params(), &sim.metrics()))?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod text;
pub mod writer;


pub use crate::csv::{CsvResultLogger, CsvTraceWriter, RESULT_COLUMNS, TRACE_COLUMNS};
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{ResultRow, TraceRow, unix_now};
pub use text::render_roads;
pub use writer::{ResultSink, TraceWriter};
