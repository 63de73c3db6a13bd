//! Error types for ix-sweep.

use ix_core::RunId;
use ix_output::OutputError;
use ix_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("run {} panicked: {message}", run_id.0)]
    Panicked { run_id: RunId, message: String },

    #[error("worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type SweepResult<T> = Result<T, SweepError>;
