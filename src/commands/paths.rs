use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Get the directory the binary is installed into
#[tracing::instrument(skip(runtime))]
pub fn get_bin_dir<R: Runtime>(runtime: &R, bin_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match bin_dir {
        Some(path) => path,
        None => default_bin_dir(runtime)?,
    };

    info!("Using bin directory: {}", dir.display());
    Ok(dir)
}

/// Get the default bin directory
#[tracing::instrument(skip(runtime))]
pub fn default_bin_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if runtime.is_privileged() {
        Ok(PathBuf::from("/usr/local/bin"))
    } else {
        let home_dir = runtime
            .home_dir()
            .context("Could not find home directory")?;
        Ok(home_dir.join(".local").join("bin"))
    }
}

/// Whether `dir` appears in the `PATH` environment variable.
pub fn is_on_path<R: Runtime>(runtime: &R, dir: &Path) -> bool {
    match runtime.env_var("PATH") {
        Ok(path) => std::env::split_paths(&path).any(|entry| entry == dir),
        Err(_) => false,
    }
}
