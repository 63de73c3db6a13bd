//! Sink traits implemented by the output backends.

use std::collections::HashSet;

use ix_core::RunId;

use crate::{OutputResult, ResultRow, TraceRow};

/// Destination for finished-run rows.
///
/// Rows are identified by `run_id`; a sink accepts each identifier at most
/// once so a resumed sweep never duplicates results.
pub trait ResultSink {
    /// Record `row`.  Returns `Ok(false)` if its `run_id` was already present
    /// and the row was skipped.
    fn log(&mut self, row: &ResultRow) -> OutputResult<bool>;

    /// Identifiers already recorded.
    fn contains(&self, run_id: RunId) -> bool;

    /// Flush any buffered output.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// In-memory sink, mostly for tests and for callers that post-process rows.
impl ResultSink for Vec<ResultRow> {
    fn log(&mut self, row: &ResultRow) -> OutputResult<bool> {
        if ResultSink::contains(self, row.run_id) {
            return Ok(false);
        }
        self.push(row.clone());
        Ok(true)
    }

    fn contains(&self, run_id: RunId) -> bool {
        self.iter().any(|r| r.run_id == run_id)
    }
}

/// Bookkeeping shared by sinks that deduplicate by id.
#[derive(Debug, Default)]
pub(crate) struct SeenIds(HashSet<RunId>);

impl SeenIds {
    pub(crate) fn insert(&mut self, id: RunId) -> bool {
        self.0.insert(id)
    }

    pub(crate) fn contains(&self, id: RunId) -> bool {
        self.0.contains(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// Per-tick trace backend driven by [`TraceObserver`](crate::TraceObserver).
///
/// Errors are returned to the observer, which stores them for
/// [`take_error`](crate::TraceObserver::take_error).
pub trait TraceWriter {
    fn write_tick(&mut self, row: &TraceRow) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
