//! # sr-eval
//!
//! Super-resolution model evaluation.
//!
//! Runs a model over a held-out test set, writes every estimate to disk and
//! scores it against the ground truth with PSNR and SSIM, both on the color
//! channels and on BT.601 luma, excluding a border equal to the scale factor.
//!
//! Models plug in through the [`SuperResolver`] trait and datasets through
//! [`Dataset`]; interpolation baselines and a paired-folder dataset are
//! built in.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sr_eval::{EvalConfig, EvalSession, Options, Seeds};
//!
//! let mut options = Options::parse("options/test_x4.json".as_ref())?;
//! let step = sr_eval::checkpoint::resolve_checkpoints(&mut options)?;
//! println!("Random seed: {}", Seeds::resolve(options.train.manual_seed).master);
//!
//! let mut model = sr_eval::model::define_model(&options)?;
//! let session = EvalSession::new(EvalConfig::from_options(&options, step));
//!
//! for test_set in options.test_datasets() {
//!     let dataset = sr_eval::data::define_dataset(&test_set, options.scale)?;
//!     let report = session.run(dataset.as_ref(), model.as_mut(), |_| {})?;
//!     println!("{:.2} dB", report.average.psnr_y);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`options`]: Options document with documented defaults
//! - [`checkpoint`]: Latest-checkpoint discovery
//! - [`seed`]: Reproducible seeding
//! - [`data`]: Test samples and datasets
//! - [`model`]: Model trait and interpolation baselines
//! - [`metrics`]: PSNR, SSIM and luma conversion
//! - [`eval`]: Evaluation loop and reports
//! - [`stats`]: Summary statistics

pub mod checkpoint;
pub mod data;
pub mod error;
pub mod eval;
pub mod imageio;
pub mod metrics;
pub mod model;
pub mod options;
pub mod seed;
pub mod stats;

// Re-export commonly used types
pub use data::{Dataset, Sample};
pub use error::{Error, Result};
pub use eval::{
    report::{ImageResult, TestReport},
    session::{EvalConfig, EvalSession},
};
pub use metrics::{ChannelOrder, ImageMetrics, MetricAccumulator, Planes};
pub use model::{SuperResolver, Visuals};
pub use options::Options;
pub use seed::Seeds;
pub use stats::Summary;
