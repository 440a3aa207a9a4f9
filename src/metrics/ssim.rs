//! Windowed SSIM (structural similarity).
//!
//! Local statistics are taken under an 11x11 Gaussian window (sigma 1.5)
//! at every position where the window fits entirely inside the image. The
//! window is separable, so filtering runs as a horizontal pass followed by
//! a vertical pass.

use imgref::ImgRef;

use crate::error::{Error, Result};
use crate::metrics::planes::Planes;

/// Window side length.
pub const WINDOW_SIZE: usize = 11;

/// Gaussian standard deviation of the window.
pub const WINDOW_SIGMA: f64 = 1.5;

const C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// Normalised 1-D Gaussian kernel; the 2-D window is its outer product.
#[must_use]
pub fn gaussian_kernel() -> [f64; WINDOW_SIZE] {
    let center = (WINDOW_SIZE / 2) as f64;
    let mut kernel = [0.0; WINDOW_SIZE];
    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f64 - center;
        *k = (-(x * x) / (2.0 * WINDOW_SIGMA * WINDOW_SIGMA)).exp();
    }
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Calculate SSIM between two images after removing `border` pixels per side.
///
/// Multi-channel images are scored per channel and the scores averaged.
///
/// # Errors
///
/// - [`Error::ChannelMismatch`] / [`Error::DimensionMismatch`] if the images
///   differ in layout or size.
/// - [`Error::EmptyCrop`] if the border removes every pixel.
/// - [`Error::ImageTooSmall`] if the cropped image is narrower or shorter
///   than the window.
pub fn calculate_ssim(estimated: &Planes, reference: &Planes, border: usize) -> Result<f64> {
    estimated.check_same_shape(reference)?;
    let a = estimated.cropped(border)?;
    let b = reference.cropped(border)?;

    let (width, height) = (a[0].width(), a[0].height());
    if width < WINDOW_SIZE || height < WINDOW_SIZE {
        return Err(Error::ImageTooSmall {
            metric: "SSIM",
            min: WINDOW_SIZE,
            width,
            height,
        });
    }

    let kernel = gaussian_kernel();
    let total: f64 = a
        .iter()
        .zip(&b)
        .map(|(pa, pb)| ssim_plane(*pa, *pb, &kernel))
        .sum();

    Ok(total / a.len() as f64)
}

fn ssim_plane(a: ImgRef<'_, f64>, b: ImgRef<'_, f64>, kernel: &[f64; WINDOW_SIZE]) -> f64 {
    let (width, height) = (a.width(), a.height());
    let x: Vec<f64> = a.rows().flatten().copied().collect();
    let y: Vec<f64> = b.rows().flatten().copied().collect();
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p * q).collect();

    let mu1 = filter_valid(&x, width, height, kernel);
    let mu2 = filter_valid(&y, width, height, kernel);
    let e_xx = filter_valid(&xx, width, height, kernel);
    let e_yy = filter_valid(&yy, width, height, kernel);
    let e_xy = filter_valid(&xy, width, height, kernel);

    let mut sum = 0.0;
    for i in 0..mu1.len() {
        let mu1_sq = mu1[i] * mu1[i];
        let mu2_sq = mu2[i] * mu2[i];
        let mu1_mu2 = mu1[i] * mu2[i];
        let sigma1_sq = e_xx[i] - mu1_sq;
        let sigma2_sq = e_yy[i] - mu2_sq;
        let sigma12 = e_xy[i] - mu1_mu2;

        sum += ((2.0 * mu1_mu2 + C1) * (2.0 * sigma12 + C2))
            / ((mu1_sq + mu2_sq + C1) * (sigma1_sq + sigma2_sq + C2));
    }

    sum / mu1.len() as f64
}

/// Correlate `src` (row-major, `width` x `height`) with the separable window,
/// keeping only positions where the window fits.
fn filter_valid(src: &[f64], width: usize, height: usize, kernel: &[f64; WINDOW_SIZE]) -> Vec<f64> {
    let out_w = width + 1 - WINDOW_SIZE;
    let out_h = height + 1 - WINDOW_SIZE;

    let mut horizontal = vec![0.0; out_w * height];
    for (row, dst) in src.chunks_exact(width).zip(horizontal.chunks_exact_mut(out_w)) {
        for (x, d) in dst.iter_mut().enumerate() {
            *d = row[x..x + WINDOW_SIZE]
                .iter()
                .zip(kernel)
                .map(|(v, k)| v * k)
                .sum();
        }
    }

    let mut out = vec![0.0; out_w * out_h];
    for (y, dst) in out.chunks_exact_mut(out_w).enumerate() {
        for (k, weight) in kernel.iter().enumerate() {
            let row = &horizontal[(y + k) * out_w..(y + k + 1) * out_w];
            for (d, v) in dst.iter_mut().zip(row) {
                *d += weight * v;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgref::ImgVec;
    use rgb::RGB8;

    fn textured(width: usize, height: usize, seed: u32) -> Planes {
        let pixels = (0..width * height)
            .map(|i| {
                let mut v = (i as u32).wrapping_add(seed.wrapping_mul(0x9E37_79B9));
                v ^= v >> 16;
                v = v.wrapping_mul(0x85EB_CA6B);
                v ^= v >> 13;
                v = v.wrapping_mul(0xC2B2_AE35);
                v ^= v >> 16;
                RGB8::new(v as u8, (v >> 8) as u8, (v >> 16) as u8)
            })
            .collect();
        Planes::from_rgb8(ImgVec::new(pixels, width, height).as_ref())
    }

    fn solid(value: u8, size: usize) -> Planes {
        let pixels = vec![RGB8::new(value, value, value); size * size];
        Planes::from_rgb8(ImgVec::new(pixels, size, size).as_ref())
    }

    #[test]
    fn test_kernel_normalised_and_symmetric() {
        let k = gaussian_kernel();
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..WINDOW_SIZE {
            assert!((k[i] - k[WINDOW_SIZE - 1 - i]).abs() < 1e-15);
        }
        assert!(k[5] > k[4]);
    }

    #[test]
    fn test_self_similarity() {
        let img = textured(40, 30, 7);
        let ssim = calculate_ssim(&img, &img, 0).unwrap();
        assert!(ssim >= 0.999999, "ssim = {ssim}");
    }

    #[test]
    fn test_symmetric() {
        let a = textured(32, 32, 1);
        let b = textured(32, 32, 99);
        let ab = calculate_ssim(&a, &b, 2).unwrap();
        let ba = calculate_ssim(&b, &a, 2).unwrap();
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab < 0.5);
    }

    #[test]
    fn test_constant_offset() {
        let a = solid(100, 32);
        let b = solid(110, 32);
        let ssim = calculate_ssim(&a, &b, 0).unwrap();
        // Zero variance: only the luminance term differs from 1.
        let expected = (2.0 * 100.0 * 110.0 + C1) / (100.0 * 100.0 + 110.0 * 110.0 + C1);
        assert!((ssim - expected).abs() < 1e-9);
        assert!(ssim > 0.99);
    }

    #[test]
    fn test_border_matches_manual_crop() {
        let full = textured(30, 28, 3);
        let other = textured(30, 28, 4);
        let border = 4;

        let crop = |p: &Planes| {
            let planes = p
                .cropped(border)
                .unwrap()
                .into_iter()
                .map(|v| ImgVec::new(v.rows().flatten().copied().collect(), v.width(), v.height()))
                .collect();
            Planes::new(p.order(), planes).unwrap()
        };

        let with_border = calculate_ssim(&full, &other, border).unwrap();
        let pre_cropped = calculate_ssim(&crop(&full), &crop(&other), 0).unwrap();
        assert!((with_border - pre_cropped).abs() < 1e-12);
    }

    #[test]
    fn test_too_small_after_crop() {
        let a = textured(20, 14, 1);
        let err = calculate_ssim(&a, &a, 2).unwrap_err();
        assert!(matches!(err, Error::ImageTooSmall { height: 10, .. }));
    }

    #[test]
    fn test_minimum_size_single_window() {
        let a = textured(11, 11, 5);
        let b = textured(11, 11, 6);
        assert!(calculate_ssim(&a, &b, 0).is_ok());
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = textured(20, 20, 1);
        let b = textured(21, 20, 1);
        assert!(matches!(
            calculate_ssim(&a, &b, 0),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_filter_valid_constant() {
        let k = gaussian_kernel();
        let src = vec![3.0; 12 * 13];
        let out = filter_valid(&src, 12, 13, &k);
        assert_eq!(out.len(), 2 * 3);
        assert!(out.iter().all(|v| (v - 3.0).abs() < 1e-12));
    }
}
