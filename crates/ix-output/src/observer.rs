//! `TraceObserver<W>`: bridges `SimObserver` to a `TraceWriter`.

use ix_core::{LightState, Tick};
use ix_sim::{MetricsSnapshot, SimObserver, TickReport};

use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult, TraceRow};

/// A [`SimObserver`] that writes one [`TraceRow`] per tick to any
/// [`TraceWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check with
/// [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the first stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Rows written successfully.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> SimObserver for TraceObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, report: &TickReport, lights: [LightState; 2]) {
        let result = self.writer.write_tick(&TraceRow::new(tick, report, lights));
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick, _metrics: &MetricsSnapshot) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
