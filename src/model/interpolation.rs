//! Interpolation baselines.

use std::path::Path;

use image::imageops::FilterType;
use imgref::ImgVec;
use rgb::RGB8;
use tracing::{debug, warn};

use crate::data::Sample;
use crate::error::{Error, Result};
use crate::imageio::resize;
use crate::model::{SuperResolver, Visuals};

/// Upscaling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Catmull-Rom cubic.
    Bicubic,
    /// Triangle filter.
    Bilinear,
    /// Pixel replication.
    Nearest,
}

impl Interpolation {
    /// Parse a `net_type` value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bicubic" => Some(Self::Bicubic),
            "bilinear" => Some(Self::Bilinear),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }

    /// Canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bicubic => "bicubic",
            Self::Bilinear => "bilinear",
            Self::Nearest => "nearest",
        }
    }

    fn filter(self) -> FilterType {
        match self {
            Self::Bicubic => FilterType::CatmullRom,
            Self::Bilinear => FilterType::Triangle,
            Self::Nearest => FilterType::Nearest,
        }
    }
}

/// Weightless model that upscales the input by the configured factor.
#[derive(Debug)]
pub struct InterpolationModel {
    method: Interpolation,
    scale: usize,
    low: Option<ImgVec<RGB8>>,
    reference: Option<ImgVec<RGB8>>,
    estimated: Option<ImgVec<RGB8>>,
}

impl InterpolationModel {
    /// Create a model upscaling by `scale`. Interpolation is deterministic,
    /// so no seed is involved.
    #[must_use]
    pub fn new(method: Interpolation, scale: usize) -> Self {
        Self {
            method,
            scale,
            low: None,
            reference: None,
            estimated: None,
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::Model {
            model: self.method.as_str().to_string(),
            message: message.to_string(),
        }
    }
}

impl SuperResolver for InterpolationModel {
    fn name(&self) -> &str {
        self.method.as_str()
    }

    fn load(&mut self, checkpoint: Option<&Path>) -> Result<()> {
        if let Some(path) = checkpoint {
            warn!(
                model = self.method.as_str(),
                checkpoint = %path.display(),
                "interpolation model has no weights; checkpoint ignored"
            );
        }
        debug!(model = self.method.as_str(), scale = self.scale, "model ready");
        Ok(())
    }

    fn feed_data(&mut self, sample: &Sample) {
        self.low = Some(sample.low.clone());
        self.reference = Some(sample.high.clone());
        self.estimated = None;
    }

    fn test(&mut self) -> Result<()> {
        let low = self.low.as_ref().ok_or_else(|| self.error("test called before feed_data"))?;
        let estimated = resize(
            low.as_ref(),
            low.width() * self.scale,
            low.height() * self.scale,
            self.method.filter(),
        );
        self.estimated = Some(estimated);
        Ok(())
    }

    fn current_visuals(&self) -> Result<Visuals> {
        let estimated = self
            .estimated
            .clone()
            .ok_or_else(|| self.error("current_visuals called before test"))?;
        let reference = self
            .reference
            .clone()
            .ok_or_else(|| self.error("current_visuals called before feed_data"))?;
        Ok(Visuals {
            estimated,
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(width: usize, height: usize, scale: usize) -> Sample {
        let value = RGB8::new(40, 80, 120);
        Sample {
            low: ImgVec::new(vec![value; width * height], width, height),
            high: ImgVec::new(vec![value; width * height * scale * scale], width * scale, height * scale),
            low_path: PathBuf::from("lr/x.png"),
            high_path: PathBuf::from("hr/x.png"),
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Interpolation::from_name("Bicubic"), Some(Interpolation::Bicubic));
        assert_eq!(Interpolation::from_name("nearest"), Some(Interpolation::Nearest));
        assert_eq!(Interpolation::from_name("rrdb"), None);
    }

    #[test]
    fn test_upscales_by_scale() {
        let mut model = InterpolationModel::new(Interpolation::Nearest, 3);
        model.feed_data(&sample(5, 4, 3));
        model.test().unwrap();
        let visuals = model.current_visuals().unwrap();
        assert_eq!((visuals.estimated.width(), visuals.estimated.height()), (15, 12));
        assert_eq!(visuals.estimated.buf(), visuals.reference.buf());
    }

    #[test]
    fn test_call_order_enforced() {
        let mut model = InterpolationModel::new(Interpolation::Bicubic, 2);
        assert!(matches!(model.test(), Err(Error::Model { .. })));
        model.feed_data(&sample(4, 4, 2));
        assert!(model.current_visuals().is_err());
        model.test().unwrap();
        assert!(model.current_visuals().is_ok());
    }

    #[test]
    fn test_load_ignores_checkpoint() {
        let mut model = InterpolationModel::new(Interpolation::Bilinear, 2);
        assert!(model.load(Some(Path::new("models/1000_G.pth"))).is_ok());
        assert!(model.load(None).is_ok());
    }
}
