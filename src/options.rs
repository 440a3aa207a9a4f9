//! Options document for a test run.
//!
//! The document is JSON with optional `//` comment lines. Every field has a
//! documented default, so a missing key never needs a runtime lookup
//! fallback.
//!
//! ```json
//! {
//!   "task": "swinir_sr_x4",
//!   "scale": 4,
//!   "path": { "root": "superresolution" },
//!   "datasets": {
//!     "test": { "name": "set5", "dataset_type": "sr",
//!               "dataroot_H": "testsets/set5/HR", "dataroot_L": null }
//!   },
//!   "netG": { "net_type": "bicubic" },
//!   "train": { "manual_seed": 10 }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Task name; names the result directory. Default `"sr"`.
    pub task: String,
    /// Model wrapper kind. Default `"plain"`.
    pub model: String,
    /// Upscaling factor, also the metric border. Default `4`.
    pub scale: usize,
    /// Image channels. Default `3`.
    pub n_channels: usize,
    /// Directory layout.
    pub path: PathOptions,
    /// Datasets keyed by phase (`"train"`, `"test"`, `"test_urban"`, ...).
    pub datasets: BTreeMap<String, DatasetOptions>,
    /// Generator network.
    #[serde(rename = "netG")]
    pub net_g: NetworkOptions,
    /// Training options; only the seed is read here.
    pub train: TrainOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            task: "sr".to_string(),
            model: "plain".to_string(),
            scale: 4,
            n_channels: 3,
            path: PathOptions::default(),
            datasets: BTreeMap::new(),
            net_g: NetworkOptions::default(),
            train: TrainOptions::default(),
        }
    }
}

/// Directory layout. Unset directories are derived from `root` and the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Results root. Default `"results"`.
    pub root: PathBuf,
    /// `<root>/<task>`.
    pub task: Option<PathBuf>,
    /// Checkpoint directory, `<task>/models`.
    pub models: Option<PathBuf>,
    /// Output image directory, `<task>/images`.
    pub images: Option<PathBuf>,
    /// Report directory, `<task>`.
    pub log: Option<PathBuf>,
    /// Generator weights.
    #[serde(rename = "pretrained_netG")]
    pub pretrained_net_g: Option<PathBuf>,
    /// EMA generator weights.
    #[serde(rename = "pretrained_netE")]
    pub pretrained_net_e: Option<PathBuf>,
    /// Generator optimizer state.
    #[serde(rename = "pretrained_optimizerG")]
    pub pretrained_optimizer_g: Option<PathBuf>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("results"),
            task: None,
            models: None,
            images: None,
            log: None,
            pretrained_net_g: None,
            pretrained_net_e: None,
            pretrained_optimizer_g: None,
        }
    }
}

impl PathOptions {
    /// Checkpoint directory. Set by [`Options::parse`].
    #[must_use]
    pub fn models_dir(&self) -> PathBuf {
        self.models.clone().unwrap_or_else(|| self.root.join("models"))
    }

    /// Output image directory. Set by [`Options::parse`].
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.images.clone().unwrap_or_else(|| self.root.join("images"))
    }

    /// Report directory. Set by [`Options::parse`].
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.log.clone().unwrap_or_else(|| self.root.clone())
    }
}

/// One dataset entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// Display name. Default: the phase key.
    pub name: Option<String>,
    /// Dataset kind. Default `"sr"`.
    pub dataset_type: String,
    /// Ground-truth directory.
    #[serde(rename = "dataroot_H")]
    pub dataroot_h: Option<PathBuf>,
    /// Low-quality directory; synthesised from ground truth when absent.
    #[serde(rename = "dataroot_L")]
    pub dataroot_l: Option<PathBuf>,
    /// Channels; falls back to the top-level `n_channels`.
    pub n_channels: Option<usize>,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            name: None,
            dataset_type: "sr".to_string(),
            dataroot_h: None,
            dataroot_l: None,
            n_channels: None,
        }
    }
}

/// Generator network options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkOptions {
    /// Network type. Default `"bicubic"`.
    pub net_type: String,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            net_type: "bicubic".to_string(),
        }
    }
}

/// Training options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// Seed for every random source; drawn at random when absent.
    pub manual_seed: Option<u64>,
}

/// A selected test dataset.
#[derive(Debug, Clone)]
pub struct TestSet<'a> {
    /// Phase key in the options document.
    pub phase: &'a str,
    /// Dataset options.
    pub options: &'a DatasetOptions,
}

impl TestSet<'_> {
    /// Display name: the configured name or the phase key.
    #[must_use]
    pub fn name(&self) -> &str {
        self.options.name.as_deref().unwrap_or(self.phase)
    }
}

impl Options {
    /// Read, parse and normalise an options file.
    pub fn parse(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse and normalise an options document.
    pub fn from_json(content: &str) -> Result<Self> {
        let json = strip_comments(content);
        let mut options: Self = serde_json::from_str(&json)?;
        options.normalize()?;
        Ok(options)
    }

    fn normalize(&mut self) -> Result<()> {
        if self.scale == 0 {
            return Err(Error::Config("scale must be at least 1".to_string()));
        }

        let task = self
            .path
            .task
            .get_or_insert_with(|| self.path.root.join(&self.task))
            .clone();
        self.path.models.get_or_insert_with(|| task.join("models"));
        self.path.images.get_or_insert_with(|| task.join("images"));
        self.path.log.get_or_insert_with(|| task.clone());

        for dataset in self.datasets.values_mut() {
            dataset.n_channels.get_or_insert(self.n_channels);
        }

        // Test sets share the image and report trees, keyed by name.
        let test_sets = self.test_datasets();
        let mut names = BTreeSet::new();
        for test_set in &test_sets {
            if !names.insert(test_set.name()) {
                return Err(Error::Config(format!(
                    "duplicate test set name {:?} (phase {})",
                    test_set.name(),
                    test_set.phase
                )));
            }
        }
        Ok(())
    }

    /// Metric border, equal to the scale factor.
    #[must_use]
    pub fn border(&self) -> usize {
        self.scale
    }

    /// Every dataset whose phase is `test` or starts with `test_`, in key order.
    #[must_use]
    pub fn test_datasets(&self) -> Vec<TestSet<'_>> {
        self.datasets
            .iter()
            .filter(|(phase, _)| phase.as_str() == "test" || phase.starts_with("test_"))
            .map(|(phase, options)| TestSet { phase, options })
            .collect()
    }

    /// Create every output directory (pretrained paths are left alone).
    pub fn prepare_dirs(&self) -> Result<()> {
        for dir in [&self.path.task, &self.path.models, &self.path.images, &self.path.log]
            .into_iter()
            .flatten()
        {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Drop lines whose first non-blank characters are `//`.
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_document() {
        let options = Options::from_json("{}").unwrap();
        assert_eq!(options.scale, 4);
        assert_eq!(options.border(), 4);
        assert_eq!(options.n_channels, 3);
        assert_eq!(options.net_g.net_type, "bicubic");
        assert!(options.train.manual_seed.is_none());
        assert!(options.test_datasets().is_empty());
    }

    #[test]
    fn test_derived_paths() {
        let options = Options::from_json(r#"{"task": "x2", "path": {"root": "out"}}"#).unwrap();
        assert_eq!(options.path.task, Some(PathBuf::from("out/x2")));
        assert_eq!(options.path.models_dir(), PathBuf::from("out/x2/models"));
        assert_eq!(options.path.images_dir(), PathBuf::from("out/x2/images"));
        assert_eq!(options.path.log_dir(), PathBuf::from("out/x2"));
    }

    #[test]
    fn test_explicit_images_dir_kept() {
        let options = Options::from_json(r#"{"path": {"images": "/tmp/imgs"}}"#).unwrap();
        assert_eq!(options.path.images_dir(), PathBuf::from("/tmp/imgs"));
    }

    #[test]
    fn test_comment_lines_stripped() {
        let json = r#"
            // generated by hand
            {
              "scale": 2,
              // "scale": 8,
              "train": { "manual_seed": 42 }
            }
        "#;
        let options = Options::from_json(json).unwrap();
        assert_eq!(options.scale, 2);
        assert_eq!(options.train.manual_seed, Some(42));
    }

    #[test]
    fn test_original_key_spelling() {
        let json = r#"{
            "netG": {"net_type": "nearest"},
            "path": {"pretrained_netG": "models/100_G.pth"},
            "datasets": {"test": {"dataroot_H": "hr", "dataroot_L": "lr"}}
        }"#;
        let options = Options::from_json(json).unwrap();
        assert_eq!(options.net_g.net_type, "nearest");
        assert_eq!(options.path.pretrained_net_g, Some(PathBuf::from("models/100_G.pth")));
        let test = &options.datasets["test"];
        assert_eq!(test.dataroot_h, Some(PathBuf::from("hr")));
        assert_eq!(test.dataroot_l, Some(PathBuf::from("lr")));
        assert_eq!(test.n_channels, Some(3));
    }

    #[test]
    fn test_multiple_test_sets_selected_in_order() {
        let json = r#"{"datasets": {
            "train": {},
            "test_urban": {"name": "urban100"},
            "test": {},
            "testing": {}
        }}"#;
        let options = Options::from_json(json).unwrap();
        let sets = options.test_datasets();
        let phases: Vec<_> = sets.iter().map(|s| s.phase).collect();
        assert_eq!(phases, vec!["test", "test_urban"]);
        assert_eq!(sets[0].name(), "test");
        assert_eq!(sets[1].name(), "urban100");
    }

    #[test]
    fn test_duplicate_test_set_names_rejected() {
        let json = r#"{"datasets": {
            "test": {"name": "set5"},
            "test_b": {"name": "set5"}
        }}"#;
        assert!(matches!(Options::from_json(json), Err(Error::Config(_))));

        // A configured name may not shadow another set's phase key either.
        let json = r#"{"datasets": {"test": {}, "test_b": {"name": "test"}}}"#;
        assert!(matches!(Options::from_json(json), Err(Error::Config(_))));

        // Non-test phases are free to reuse names.
        let json = r#"{"datasets": {"train": {"name": "set5"}, "test": {"name": "set5"}}}"#;
        assert!(Options::from_json(json).is_ok());
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(matches!(
            Options::from_json(r#"{"scale": 0}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_prepare_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let json = format!(
            r#"{{"task": "t", "path": {{"root": {}}}}}"#,
            serde_json::to_string(dir.path()).unwrap()
        );
        let options = Options::from_json(&json).unwrap();
        options.prepare_dirs().unwrap();
        assert!(dir.path().join("t/models").is_dir());
        assert!(dir.path().join("t/images").is_dir());
    }

    #[test]
    fn test_parse_missing_file() {
        let result = Options::parse(Path::new("/nonexistent/options.json"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
