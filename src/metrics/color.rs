//! BT.601 luma conversion.
//!
//! Uses the "digital" YCbCr luma formula, where a full-range RGB image maps
//! to the studio range `[16, 235]`:
//!
//! ```text
//! Y = (65.481 R + 128.553 G + 24.966 B) / 255 + 16      (R, G, B in [0, 255])
//! ```
//!
//! The result is left unrounded.

use imgref::ImgVec;

use crate::error::{Error, Result};
use crate::metrics::planes::{ChannelOrder, Planes};

/// Red weight.
pub const LUMA_R: f64 = 65.481;
/// Green weight.
pub const LUMA_G: f64 = 128.553;
/// Blue weight.
pub const LUMA_B: f64 = 24.966;
/// Black level offset.
pub const LUMA_OFFSET: f64 = 16.0;

/// Luma of one pixel with components in `[0, 255]`.
#[inline]
#[must_use]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    (LUMA_R * r + LUMA_G * g + LUMA_B * b) / 255.0 + LUMA_OFFSET
}

/// Convert an RGB or BGR image to a single luma plane.
pub fn to_luma(image: &Planes) -> Result<Planes> {
    let planes = image.planes();
    let (r, g, b) = match image.order() {
        ChannelOrder::Rgb => (&planes[0], &planes[1], &planes[2]),
        ChannelOrder::Bgr => (&planes[2], &planes[1], &planes[0]),
        ChannelOrder::Luma => {
            return Err(Error::InvalidColorOrder {
                operation: "to_luma",
                order: image.order().to_string(),
            });
        }
    };

    let y: Vec<f64> = r
        .buf()
        .iter()
        .zip(g.buf())
        .zip(b.buf())
        .map(|((&r, &g), &b)| luma(r, g, b))
        .collect();

    Ok(Planes::from_luma(ImgVec::new(y, image.width(), image.height())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    fn solid(px: RGB8) -> Planes {
        Planes::from_rgb8(ImgVec::new(vec![px; 4], 2, 2).as_ref())
    }

    #[test]
    fn test_studio_range() {
        assert!((luma(255.0, 255.0, 255.0) - 235.0).abs() < 1e-9);
        assert!((luma(0.0, 0.0, 0.0) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_rgb_and_bgr_agree() {
        let rgb = solid(RGB8::new(200, 50, 10));
        let bgr = rgb.to_bgr().unwrap();
        let from_rgb = to_luma(&rgb).unwrap();
        let from_bgr = to_luma(&bgr).unwrap();
        assert_eq!(from_rgb.planes()[0].buf(), from_bgr.planes()[0].buf());
    }

    #[test]
    fn test_red_weight() {
        let y = to_luma(&solid(RGB8::new(255, 0, 0))).unwrap();
        assert_eq!(y.order(), ChannelOrder::Luma);
        assert!((y.planes()[0].buf()[0] - (LUMA_R + LUMA_OFFSET)).abs() < 1e-9);
    }

    #[test]
    fn test_luma_input_rejected() {
        let y = to_luma(&solid(RGB8::new(1, 2, 3))).unwrap();
        assert!(matches!(to_luma(&y), Err(Error::InvalidColorOrder { .. })));
    }
}
