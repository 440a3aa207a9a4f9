//! Image file I/O and resampling.
//!
//! Bridges the `image` crate's buffers and the `imgref`/`rgb` types used by
//! the rest of the crate.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use crate::error::{Error, Result};

/// Decode an image file to RGB8.
///
/// Grayscale and alpha inputs are expanded/flattened to RGB.
pub fn load_rgb8(path: &Path) -> Result<ImgVec<RGB8>> {
    let img = image::open(path).map_err(|e| Error::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(from_rgb_image(&img.to_rgb8()))
}

/// Decode an image file as single-channel gray, replicated into RGB8.
pub fn load_gray_as_rgb8(path: &Path) -> Result<ImgVec<RGB8>> {
    let img = image::open(path).map_err(|e| Error::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let gray = img.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let pixels = gray.into_raw().into_iter().map(|v| RGB8::new(v, v, v)).collect();
    Ok(ImgVec::new(pixels, width, height))
}

/// Encode an RGB8 image as PNG, creating parent directories.
pub fn save_png(image: ImgRef<'_, RGB8>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    to_rgb_image(image).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Resample to `width` x `height`.
#[must_use]
pub fn resize(image: ImgRef<'_, RGB8>, width: usize, height: usize, filter: FilterType) -> ImgVec<RGB8> {
    let src = to_rgb_image(image);
    let out = imageops::resize(&src, width as u32, height as u32, filter);
    from_rgb_image(&out)
}

/// Crop the bottom/right so both sides are multiples of `scale`.
#[must_use]
pub fn modcrop(image: ImgRef<'_, RGB8>, scale: usize) -> ImgVec<RGB8> {
    let width = image.width() - image.width() % scale;
    let height = image.height() - image.height() % scale;
    let sub = image.sub_image(0, 0, width, height);
    ImgVec::new(sub.pixels().collect(), width, height)
}

fn from_rgb_image(img: &RgbImage) -> ImgVec<RGB8> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let pixels = img
        .as_raw()
        .chunks_exact(3)
        .map(|c| RGB8::new(c[0], c[1], c[2]))
        .collect();
    ImgVec::new(pixels, width, height)
}

fn to_rgb_image(image: ImgRef<'_, RGB8>) -> RgbImage {
    let (width, height) = (image.width() as u32, image.height() as u32);
    RgbImage::from_fn(width, height, |x, y| {
        let px = image[(x as usize, y as usize)];
        image::Rgb([px.r, px.g, px.b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> ImgVec<RGB8> {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { RGB8::new(255, 0, 0) } else { RGB8::new(0, 0, 255) }))
            .collect();
        ImgVec::new(pixels, width, height)
    }

    #[test]
    fn test_png_roundtrip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let img = checker(7, 5);
        save_png(img.as_ref(), &path).unwrap();

        let loaded = load_rgb8(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (7, 5));
        assert_eq!(loaded.buf(), img.buf());
    }

    #[test]
    fn test_gray_load_replicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.png");
        save_png(checker(4, 4).as_ref(), &path).unwrap();

        let gray = load_gray_as_rgb8(&path).unwrap();
        assert!(gray.pixels().all(|p| p.r == p.g && p.g == p.b));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_rgb8(Path::new("/nonexistent/x.png"));
        assert!(matches!(result, Err(Error::ImageLoad { .. })));
    }

    #[test]
    fn test_modcrop() {
        let img = checker(10, 7);
        let cropped = modcrop(img.as_ref(), 4);
        assert_eq!((cropped.width(), cropped.height()), (8, 4));
        assert_eq!(cropped[(1usize, 1usize)], img[(1usize, 1usize)]);
    }

    #[test]
    fn test_resize_dimensions() {
        let img = checker(8, 6);
        let up = resize(img.as_ref(), 16, 12, FilterType::Nearest);
        assert_eq!((up.width(), up.height()), (16, 12));
        assert_eq!(up[(0usize, 0usize)], RGB8::new(255, 0, 0));
    }
}
