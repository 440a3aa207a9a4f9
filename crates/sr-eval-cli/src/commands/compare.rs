//! Metric comparison of two image files.

use std::path::Path;

use anyhow::{Context, Result};
use sr_eval::imageio::load_rgb8;
use sr_eval::metrics::evaluate_pair;

pub fn run(estimated: &Path, reference: &Path, border: usize) -> Result<()> {
    let est = load_rgb8(estimated)?;
    let refr = load_rgb8(reference)?;

    let metrics = evaluate_pair(est.as_ref(), refr.as_ref(), border).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            estimated.display(),
            reference.display()
        )
    })?;

    println!("PSNR   : {:.2}dB", metrics.psnr);
    println!("SSIM   : {:.4}", metrics.ssim);
    println!("PSNR_Y : {:.2}dB", metrics.psnr_y);
    println!("SSIM_Y : {:.4}", metrics.ssim_y);
    Ok(())
}
