//! Paired high/low-quality folder dataset.

use std::path::PathBuf;

use image::imageops::FilterType;
use tracing::{debug, info};

use crate::data::{Dataset, Sample, discover_images, display_path};
use crate::error::{Error, Result};
use crate::imageio::{load_gray_as_rgb8, load_rgb8, modcrop, resize};
use crate::options::DatasetOptions;

/// Ground truth from `dataroot_H`, inputs from `dataroot_L`.
///
/// Files are paired by sorted order. Without `dataroot_L`, each input is
/// synthesised by bicubic downscaling of the (mod-cropped) ground truth.
#[derive(Debug, Clone)]
pub struct PairedDataset {
    name: String,
    scale: usize,
    n_channels: usize,
    root_h: PathBuf,
    paths_h: Vec<PathBuf>,
    paths_l: Option<Vec<PathBuf>>,
}

impl PairedDataset {
    /// Scan the configured directories.
    pub fn new(name: &str, options: &DatasetOptions, scale: usize) -> Result<Self> {
        let root_h = options
            .dataroot_h
            .clone()
            .ok_or_else(|| Error::Dataset(format!("{name}: dataroot_H is required")))?;
        let n_channels = options.n_channels.unwrap_or(3);
        if n_channels != 1 && n_channels != 3 {
            return Err(Error::Dataset(format!(
                "{name}: n_channels must be 1 or 3, got {n_channels}"
            )));
        }

        let paths_h = discover_images(&root_h)?;
        let paths_l = match &options.dataroot_l {
            Some(root_l) => {
                let paths = discover_images(root_l)?;
                if paths.len() != paths_h.len() {
                    return Err(Error::Dataset(format!(
                        "{name}: {} low-quality images for {} ground-truth images",
                        paths.len(),
                        paths_h.len()
                    )));
                }
                Some(paths)
            }
            None => None,
        };

        info!(
            dataset = name,
            images = paths_h.len(),
            synthesised = paths_l.is_none(),
            "dataset ready"
        );

        Ok(Self {
            name: name.to_string(),
            scale,
            n_channels,
            root_h,
            paths_h,
            paths_l,
        })
    }

    fn load(&self, path: &std::path::Path) -> Result<imgref::ImgVec<rgb::RGB8>> {
        if self.n_channels == 1 {
            load_gray_as_rgb8(path)
        } else {
            load_rgb8(path)
        }
    }
}

impl Dataset for PairedDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.paths_h.len()
    }

    fn get(&self, index: usize) -> Result<Sample> {
        let high_path = self
            .paths_h
            .get(index)
            .ok_or_else(|| Error::Dataset(format!("{}: index {index} out of range", self.name)))?
            .clone();
        debug!(path = %display_path(&high_path, &self.root_h), "loading sample");

        let high = modcrop(self.load(&high_path)?.as_ref(), self.scale);

        let (low, low_path) = match &self.paths_l {
            Some(paths) => {
                let low_path = paths[index].clone();
                (self.load(&low_path)?, low_path)
            }
            None => {
                if high.width() < self.scale || high.height() < self.scale {
                    return Err(Error::Dataset(format!(
                        "{}: {} is smaller than the scale factor",
                        self.name,
                        high_path.display()
                    )));
                }
                let low = resize(
                    high.as_ref(),
                    high.width() / self.scale,
                    high.height() / self.scale,
                    FilterType::CatmullRom,
                );
                (low, high_path.clone())
            }
        };

        Ok(Sample {
            low,
            high,
            low_path,
            high_path,
        })
    }
}
