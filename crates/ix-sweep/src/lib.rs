//! `ix-sweep`: parameter sweeps over the intersection model.
//!
//! | Item                  | Purpose                                                   |
//! |-----------------------|-----------------------------------------------------------|
//! | [`ParameterGrid`]     | Value lists per parameter; JSON-loadable                  |
//! | [`RunConfig`]         | One expanded combination with its run id and seed         |
//! | [`run_single`]        | Build → run → snapshot → [`ResultRow`](ix_output::ResultRow) |
//! | [`Dispatcher`]        | Rayon pool running configs in parallel, panic-isolated    |
//!
//! ```rust,ignore
//! let grid: ParameterGrid = serde_json::from_str(r#"{ "p_red": [0.001, 0.05] }"#)?;
//! let mut sink = CsvResultLogger::open(Path::new("results.csv"))?;
//! let summary = Dispatcher::new(None)?.run(grid.configs(), &mut sink);
//! ```

pub mod dispatch;
pub mod error;
pub mod grid;


pub use dispatch::{Dispatcher, SweepFailure, SweepSummary, run_single};
pub use error::{SweepError, SweepResult};
pub use grid::{ParameterGrid, RunConfig};
