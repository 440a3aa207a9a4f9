//! Test datasets.
//!
//! A [`Dataset`] yields [`Sample`]s one at a time: a low-quality input, its
//! ground truth, and the path used to name outputs. Datasets are built from
//! the options document by [`define_dataset`].

mod discovery;
mod paired;

use std::path::{Path, PathBuf};

use imgref::ImgVec;
use rgb::RGB8;

pub use discovery::{discover_images, is_image};
pub use paired::PairedDataset;

use crate::error::{Error, Result};
use crate::options::TestSet;

/// One test image pair.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Low-quality model input.
    pub low: ImgVec<RGB8>,
    /// Ground-truth reference.
    pub high: ImgVec<RGB8>,
    /// Source of the low-quality image (the ground-truth path when synthesised).
    pub low_path: PathBuf,
    /// Source of the ground truth.
    pub high_path: PathBuf,
}

impl Sample {
    /// File name of the low-quality source, e.g. `baby.png`.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.low_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File stem of the low-quality source, e.g. `baby`.
    #[must_use]
    pub fn name(&self) -> String {
        self.low_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Random-access source of test samples.
pub trait Dataset {
    /// Dataset name, used for reports.
    fn name(&self) -> &str;

    /// Number of samples.
    fn len(&self) -> usize;

    /// Whether the dataset has no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load sample `index`.
    fn get(&self, index: usize) -> Result<Sample>;
}

/// Build the dataset described by a test set entry.
pub fn define_dataset(test_set: &TestSet<'_>, scale: usize) -> Result<Box<dyn Dataset>> {
    match test_set.options.dataset_type.as_str() {
        "sr" | "super-resolution" => Ok(Box::new(PairedDataset::new(
            test_set.name(),
            test_set.options,
            scale,
        )?)),
        other => Err(Error::UnsupportedFormat(format!("dataset type {other}"))),
    }
}

/// Path relative to `root` when possible, for display.
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DatasetOptions;

    #[test]
    fn test_sample_names() {
        let sample = Sample {
            low: ImgVec::new(vec![RGB8::default()], 1, 1),
            high: ImgVec::new(vec![RGB8::default()], 1, 1),
            low_path: PathBuf::from("testsets/set5/LR/baby_x4.png"),
            high_path: PathBuf::from("testsets/set5/HR/baby.png"),
        };
        assert_eq!(sample.file_name(), "baby_x4.png");
        assert_eq!(sample.name(), "baby_x4");
    }

    #[test]
    fn test_unknown_dataset_type() {
        let options = DatasetOptions {
            dataset_type: "jpeg".to_string(),
            ..DatasetOptions::default()
        };
        let set = TestSet { phase: "test", options: &options };
        assert!(matches!(
            define_dataset(&set, 4),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("/a/b/c.png"), Path::new("/a")), "b/c.png");
        assert_eq!(display_path(Path::new("/x/c.png"), Path::new("/a")), "/x/c.png");
    }
}
