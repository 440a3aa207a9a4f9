//! Test loop over a dataset and a model.
//!
//! [`EvalSession`] pulls samples one at a time, runs inference, writes each
//! estimate as PNG, scores it against the ground truth and accumulates the
//! averages. It is strictly sequential; any error aborts the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::eval::report::{ImageResult, TestReport};
use crate::imageio::save_png;
use crate::metrics::{MetricAccumulator, evaluate_pair};
use crate::model::SuperResolver;
use crate::options::Options;
use crate::stats::MetricSummaries;

/// Configuration for an evaluation session.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Root directory for estimated images.
    pub images_dir: PathBuf,

    /// Directory for report output (CSV, JSON).
    pub report_dir: PathBuf,

    /// Pixels excluded from each side for every metric.
    pub border: usize,

    /// Training iteration, used in output file names.
    pub iteration: u64,
}

impl EvalConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }

    /// Configuration derived from a parsed options document.
    #[must_use]
    pub fn from_options(options: &Options, iteration: u64) -> Self {
        Self {
            images_dir: options.path.images_dir(),
            report_dir: options.path.log_dir(),
            border: options.border(),
            iteration,
        }
    }
}

/// Builder for [`EvalConfig`].
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    images_dir: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    border: Option<usize>,
    iteration: Option<u64>,
}

impl EvalConfigBuilder {
    /// Set the estimated image directory. Default `results/images`.
    #[must_use]
    pub fn images_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(path.into());
        self
    }

    /// Set the report output directory. Default `results`.
    #[must_use]
    pub fn report_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(path.into());
        self
    }

    /// Set the metric border. Default `0`.
    #[must_use]
    pub fn border(mut self, border: usize) -> Self {
        self.border = Some(border);
        self
    }

    /// Set the iteration used in file names. Default `0`.
    #[must_use]
    pub fn iteration(mut self, iteration: u64) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EvalConfig {
        EvalConfig {
            images_dir: self.images_dir.unwrap_or_else(|| PathBuf::from("results/images")),
            report_dir: self.report_dir.unwrap_or_else(|| PathBuf::from("results")),
            border: self.border.unwrap_or(0),
            iteration: self.iteration.unwrap_or(0),
        }
    }
}

/// Evaluation session for one model.
///
/// # Example
///
/// ```rust,ignore
/// use sr_eval::{EvalConfig, EvalSession};
///
/// let config = EvalConfig::builder()
///     .images_dir("./results/images")
///     .border(4)
///     .iteration(40_000)
///     .build();
///
/// let session = EvalSession::new(config);
/// let report = session.run(dataset.as_ref(), model.as_mut(), |result| {
///     for line in result.console_lines() {
///         println!("{line}");
///     }
/// })?;
/// ```
pub struct EvalSession {
    config: EvalConfig,
}

impl EvalSession {
    /// Create a new evaluation session.
    #[must_use]
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Output path for an image: `<images>/<name>/<name>_<iteration>.png`.
    #[must_use]
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.config
            .images_dir
            .join(name)
            .join(format!("{}_{}.png", name, self.config.iteration))
    }

    /// Evaluate every sample of `dataset` with `model`.
    ///
    /// `on_image` is called after each image is scored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] if the dataset has no samples; any
    /// load, inference, write or metric error aborts the run.
    pub fn run<F>(
        &self,
        dataset: &dyn Dataset,
        model: &mut dyn SuperResolver,
        mut on_image: F,
    ) -> Result<TestReport>
    where
        F: FnMut(&ImageResult),
    {
        if dataset.is_empty() {
            return Err(Error::EmptyDataset(dataset.name().to_string()));
        }
        info!(
            dataset = dataset.name(),
            model = model.name(),
            images = dataset.len(),
            border = self.config.border,
            "testing"
        );

        let mut accumulator = MetricAccumulator::new();
        let mut images = Vec::with_capacity(dataset.len());

        for index in 0..dataset.len() {
            let sample = dataset.get(index)?;
            let name = sample.name();
            let file_name = sample.file_name();

            let start = Instant::now();
            model.feed_data(&sample);
            model.test()?;
            let inference_time = start.elapsed();

            let visuals = model.current_visuals()?;
            drop(sample);

            let output_path = self.output_path(&name);
            save_png(visuals.estimated.as_ref(), &output_path)?;
            debug!(path = %output_path.display(), "saved estimate");

            let metrics = evaluate_pair(
                visuals.estimated.as_ref(),
                visuals.reference.as_ref(),
                self.config.border,
            )?;
            accumulator.add(&metrics);

            let result = ImageResult {
                index: index + 1,
                name: file_name,
                output_path,
                width: visuals.estimated.width() as u32,
                height: visuals.estimated.height() as u32,
                metrics,
                inference_time,
            };
            on_image(&result);
            images.push(result);
        }

        let average = accumulator
            .average()
            .ok_or_else(|| Error::EmptyDataset(dataset.name().to_string()))?;

        Ok(TestReport {
            dataset: dataset.name().to_string(),
            model: model.name().to_string(),
            iteration: self.config.iteration,
            border: self.config.border,
            summaries: MetricSummaries::compute(images.iter().map(|r| &r.metrics)),
            images,
            average,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Write a test report as JSON and CSV to the report directory.
    ///
    /// Returns the paths written.
    pub fn write_report(&self, report: &TestReport) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(&self.config.report_dir)?;

        let json_path = self.config.report_dir.join(format!("{}.json", report.file_stem()));
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&json_path, json)?;

        let csv_path = self.config.report_dir.join(format!("{}.csv", report.file_stem()));
        self.write_csv(report, &csv_path)?;

        info!(json = %json_path.display(), csv = %csv_path.display(), "wrote report");
        Ok((json_path, csv_path))
    }

    /// Write one CSV row per image.
    fn write_csv(&self, report: &TestReport, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record([
            "index",
            "image",
            "output",
            "width",
            "height",
            "psnr",
            "ssim",
            "psnr_y",
            "ssim_y",
            "inference_ms",
        ])?;

        for result in &report.images {
            wtr.write_record([
                &result.index.to_string(),
                &result.name,
                &result.output_path.display().to_string(),
                &result.width.to_string(),
                &result.height.to_string(),
                &format!("{:.4}", result.metrics.psnr),
                &format!("{:.6}", result.metrics.ssim),
                &format!("{:.4}", result.metrics.psnr_y),
                &format!("{:.6}", result.metrics.ssim_y),
                &result.inference_time.as_millis().to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
