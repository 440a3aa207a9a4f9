//! Checkpoint discovery.
//!
//! Checkpoints are stored as `<iteration>_<net_type>.pth`, e.g.
//! `40000_G.pth`, `40000_E.pth`, `40000_optimizerG.pth`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::options::Options;

/// Find the checkpoint with the highest iteration for `net_type` in `dir`.
///
/// Returns `(0, None)` if the directory does not exist or holds no matching
/// file.
pub fn find_last_checkpoint(dir: &Path, net_type: &str) -> Result<(u64, Option<PathBuf>)> {
    if !dir.is_dir() {
        return Ok((0, None));
    }

    let suffix = format!("_{net_type}.pth");
    let mut best: Option<(u64, PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(iteration) = path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|name| parse_iteration(name, &suffix))
        else {
            continue;
        };
        if best.as_ref().map_or(true, |(it, _)| iteration > *it) {
            best = Some((iteration, path));
        }
    }

    Ok(match best {
        Some((iteration, path)) => (iteration, Some(path)),
        None => (0, None),
    })
}

fn parse_iteration(file_name: &str, suffix: &str) -> Option<u64> {
    let digits = file_name.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Fill in the latest generator, EMA and optimizer checkpoints and return
/// the current step (the largest of their iterations).
///
/// Paths already set in the options are replaced only when a checkpoint is
/// found on disk.
pub fn resolve_checkpoints(options: &mut Options) -> Result<u64> {
    let models = options.path.models_dir();

    let (iter_g, path_g) = find_last_checkpoint(&models, "G")?;
    let (iter_e, path_e) = find_last_checkpoint(&models, "E")?;
    let (iter_opt, path_opt) = find_last_checkpoint(&models, "optimizerG")?;
    debug!(iter_g, iter_e, iter_opt, dir = %models.display(), "checkpoint scan");

    if path_g.is_some() {
        options.path.pretrained_net_g = path_g;
    }
    if path_e.is_some() {
        options.path.pretrained_net_e = path_e;
    }
    if path_opt.is_some() {
        options.path.pretrained_optimizer_g = path_opt;
    }

    let step = iter_g.max(iter_e).max(iter_opt);
    info!(step, "resolved checkpoints");
    Ok(step)
}
