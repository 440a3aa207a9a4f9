//! Latest checkpoint lookup.

use std::path::Path;

use anyhow::{Context, Result};
use sr_eval::checkpoint::find_last_checkpoint;

pub fn run(dir: &Path, net: &str) -> Result<()> {
    let (iteration, path) = find_last_checkpoint(dir, net)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    match path {
        Some(path) => println!("{}: iter {} ({})", net, iteration, path.display()),
        None => println!("{}: no checkpoint in {}", net, dir.display()),
    }
    Ok(())
}
