//! Descriptive statistics over per-image metrics.

use serde::{Deserialize, Serialize};

use crate::metrics::ImageMetrics;

/// Descriptive statistics for one metric across a test set.
///
/// Non-finite values (PSNR of identical images) are excluded and counted
/// in `non_finite`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of finite values.
    pub count: usize,
    /// Number of values skipped because they were infinite or NaN.
    pub non_finite: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Summary {
    /// Compute summary statistics for a slice of values.
    ///
    /// Returns `None` if no value is finite.
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count,
            non_finite: values.len() - count,
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

/// Summaries of all four metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummaries {
    /// PSNR over BGR channels.
    pub psnr: Option<Summary>,
    /// SSIM over BGR channels.
    pub ssim: Option<Summary>,
    /// PSNR on luma.
    pub psnr_y: Option<Summary>,
    /// SSIM on luma.
    pub ssim_y: Option<Summary>,
}

impl MetricSummaries {
    /// Summarise a list of per-image metrics.
    #[must_use]
    pub fn compute<'a>(metrics: impl IntoIterator<Item = &'a ImageMetrics>) -> Self {
        let metrics: Vec<&ImageMetrics> = metrics.into_iter().collect();
        let column = |f: fn(&ImageMetrics) -> f64| {
            Summary::compute(&metrics.iter().map(|m| f(m)).collect::<Vec<_>>())
        };
        Self {
            psnr: column(|m| m.psnr),
            ssim: column(|m| m.ssim),
            psnr_y: column(|m| m.psnr_y),
            ssim_y: column(|m| m.ssim_y),
        }
    }
}
