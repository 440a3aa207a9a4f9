//! Planar floating-point images with an explicit channel order.
//!
//! Metric inputs are kept as one `ImgVec<f64>` per channel. The channel
//! order travels with the pixels, so an RGB image can never be compared
//! against a BGR one by accident.

use std::fmt;

use imgref::{ImgRef, ImgVec};
use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Channel layout of a [`Planes`] image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
    /// Single BT.601 luma channel.
    Luma,
}

impl ChannelOrder {
    /// Number of channels for this layout.
    #[must_use]
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb | Self::Bgr => 3,
            Self::Luma => 1,
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => write!(f, "RGB"),
            Self::Bgr => write!(f, "BGR"),
            Self::Luma => write!(f, "Y"),
        }
    }
}

/// A planar image with values in the 8-bit range `[0, 255]`.
#[derive(Debug, Clone)]
pub struct Planes {
    order: ChannelOrder,
    planes: Vec<ImgVec<f64>>,
}

impl Planes {
    /// Build a planar image from per-channel planes.
    ///
    /// Fails if the plane count does not match `order` or if the planes
    /// differ in size.
    pub fn new(order: ChannelOrder, planes: Vec<ImgVec<f64>>) -> Result<Self> {
        if planes.len() != order.channels() {
            return Err(Error::ChannelMismatch {
                expected: format!("{} ({} planes)", order, order.channels()),
                actual: format!("{} planes", planes.len()),
            });
        }
        let first = (planes[0].width(), planes[0].height());
        for plane in &planes[1..] {
            let dims = (plane.width(), plane.height());
            if dims != first {
                return Err(Error::DimensionMismatch {
                    expected: first,
                    actual: dims,
                });
            }
        }
        Ok(Self { order, planes })
    }

    /// Split an interleaved RGB8 image into RGB planes.
    #[must_use]
    pub fn from_rgb8(image: ImgRef<'_, RGB8>) -> Self {
        let (width, height) = (image.width(), image.height());
        let len = width * height;
        let mut r = Vec::with_capacity(len);
        let mut g = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);
        for px in image.pixels() {
            r.push(f64::from(px.r));
            g.push(f64::from(px.g));
            b.push(f64::from(px.b));
        }
        Self {
            order: ChannelOrder::Rgb,
            planes: vec![
                ImgVec::new(r, width, height),
                ImgVec::new(g, width, height),
                ImgVec::new(b, width, height),
            ],
        }
    }

    /// Wrap a single luma plane.
    #[must_use]
    pub fn from_luma(plane: ImgVec<f64>) -> Self {
        Self {
            order: ChannelOrder::Luma,
            planes: vec![plane],
        }
    }

    /// Channel order of this image.
    #[must_use]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    /// Number of channels.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Per-channel planes in channel order.
    #[must_use]
    pub fn planes(&self) -> &[ImgVec<f64>] {
        &self.planes
    }

    /// Reorder an RGB image to BGR. A BGR image is returned unchanged.
    pub fn to_bgr(&self) -> Result<Self> {
        match self.order {
            ChannelOrder::Bgr => Ok(self.clone()),
            ChannelOrder::Rgb => {
                let mut planes = self.planes.clone();
                planes.reverse();
                Ok(Self {
                    order: ChannelOrder::Bgr,
                    planes,
                })
            }
            ChannelOrder::Luma => Err(Error::InvalidColorOrder {
                operation: "to_bgr",
                order: self.order.to_string(),
            }),
        }
    }

    /// Views of every plane with `border` pixels removed from each side.
    pub fn cropped(&self, border: usize) -> Result<Vec<ImgRef<'_, f64>>> {
        let (width, height) = (self.width(), self.height());
        if border >= width.div_ceil(2) || border >= height.div_ceil(2) {
            return Err(Error::EmptyCrop {
                border,
                width,
                height,
            });
        }
        let (w, h) = (width - 2 * border, height - 2 * border);
        Ok(self
            .planes
            .iter()
            .map(|p| p.as_ref().sub_image(border, border, w, h))
            .collect())
    }

    /// Ensure `other` has the same channel order and dimensions.
    pub(crate) fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.order != other.order {
            return Err(Error::ChannelMismatch {
                expected: self.order.to_string(),
                actual: other.order.to_string(),
            });
        }
        let expected = (self.width(), self.height());
        let actual = (other.width(), other.height());
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}
