//! Evaluation loop and report generation.
//!
//! - [`session::EvalSession`]: Sequential test loop over a dataset and a model
//! - [`session::EvalConfig`]: Output layout, border and iteration
//! - [`report`]: Per-image results and per-dataset reports

pub mod report;
pub mod session;

pub use report::{ImageResult, TestReport};
pub use session::{EvalConfig, EvalSession};
