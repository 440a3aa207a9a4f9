//! Report types for evaluation results.
//!
//! This module defines the data structures for test reports that can be
//! serialized to JSON or CSV, plus the console lines printed while a test
//! set runs.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::metrics::ImageMetrics;
use crate::stats::MetricSummaries;

/// Result for a single test image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResult {
    /// 1-based position in the test set.
    pub index: usize,

    /// Source file name of the input, e.g. `baby.png`.
    pub name: String,

    /// Where the estimated image was written.
    pub output_path: PathBuf,

    /// Estimated image width.
    pub width: u32,

    /// Estimated image height.
    pub height: u32,

    /// Metrics against the ground truth.
    pub metrics: ImageMetrics,

    /// Time spent in `feed_data` + `test`.
    #[serde(with = "duration_millis")]
    pub inference_time: Duration,
}

impl ImageResult {
    /// Per-image console lines (luma metrics only).
    #[must_use]
    pub fn console_lines(&self) -> [String; 2] {
        [
            format!(
                "PSNR_Y: {:->4}--> {:>10} | {:<4.2}dB",
                self.index, self.name, self.metrics.psnr_y
            ),
            format!(
                "SSIM_Y: {:->4}--> {:>10} | {:<4.4}",
                self.index, self.name, self.metrics.ssim_y
            ),
        ]
    }
}

/// Report for one test set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Dataset name.
    pub dataset: String,

    /// Model name.
    pub model: String,

    /// Training iteration the weights come from.
    pub iteration: u64,

    /// Border excluded from every metric.
    pub border: usize,

    /// Per-image results, in dataset order.
    pub images: Vec<ImageResult>,

    /// Mean of each metric over all images.
    pub average: ImageMetrics,

    /// Distribution of each metric over all images.
    pub summaries: MetricSummaries,

    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TestReport {
    /// Base name for report files: `<dataset>_<iteration>`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.dataset, self.iteration)
    }

    /// Closing console lines with the averaged metrics.
    #[must_use]
    pub fn summary_lines(&self) -> [String; 4] {
        let head = format!(
            "<epoch:{:>3}, iter:{:>8}",
            0,
            group_thousands(self.iteration)
        );
        [
            format!("{head}, Average PSNR : {:<.2}dB", self.average.psnr),
            format!("{head}, Average SSIM : {:<.4}", self.average.ssim),
            format!("{head}, Average PSNR_Y : {:<.2}dB", self.average.psnr_y),
            format!("{head}, Average SSIM_Y : {:<.4}", self.average.ssim_y),
        ]
    }
}

/// Format with `,` thousands separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// Custom serialization for Duration as milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, psnr_y: f64, ssim_y: f64) -> ImageResult {
        ImageResult {
            index,
            name: "baby.png".to_string(),
            output_path: PathBuf::from("images/baby/baby_0.png"),
            width: 512,
            height: 512,
            metrics: ImageMetrics { psnr: 30.0, ssim: 0.8, psnr_y, ssim_y },
            inference_time: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(40000), "40,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_console_lines() {
        let lines = result(3, 33.123, 0.91234).console_lines();
        assert_eq!(lines[0], "PSNR_Y: ---3-->   baby.png | 33.12dB");
        assert_eq!(lines[1], "SSIM_Y: ---3-->   baby.png | 0.9123");
    }

    #[test]
    fn test_summary_lines() {
        let report = TestReport {
            dataset: "set5".to_string(),
            model: "bicubic".to_string(),
            iteration: 40000,
            border: 4,
            images: vec![result(1, 31.0, 0.9)],
            average: ImageMetrics { psnr: 30.126, ssim: 0.87123, psnr_y: 31.554, ssim_y: 0.88901 },
            summaries: MetricSummaries::default(),
            timestamp: chrono::Utc::now(),
        };
        let lines = report.summary_lines();
        assert_eq!(lines[0], "<epoch:  0, iter:  40,000, Average PSNR : 30.13dB");
        assert_eq!(lines[3], "<epoch:  0, iter:  40,000, Average SSIM_Y : 0.8890");
        assert_eq!(report.file_stem(), "set5_40000");
    }

    #[test]
    fn test_image_result_json() {
        let json = serde_json::to_string(&result(1, 30.0, 0.9)).unwrap();
        assert!(json.contains("\"inference_time\":12"));
        let back: ImageResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.inference_time, Duration::from_millis(12));
    }
}
