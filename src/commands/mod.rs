use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};

use crate::{
    download::ArtifactSource,
    error::InstallError,
    formula::Formula,
    install::{Installer, uninstall as remove_binary},
    platform::PlatformDetector,
    resolver::resolve as resolve_artifact,
    runtime::Runtime,
    verify::verify_installed,
};

pub mod config;
mod paths;

pub use paths::{default_bin_dir, get_bin_dir, is_on_path};

use config::Config;

/// Download, verify, place and smoke-test the formula's binary.
#[tracing::instrument(skip(runtime, bin_dir))]
pub async fn install<R: Runtime>(
    runtime: R,
    formula_path: &Path,
    bin_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let config = Config::new(runtime, formula_path, bin_dir)?;
    run_install(config, quiet).await
}

#[tracing::instrument(skip(config))]
pub async fn run_install<R: Runtime, S: ArtifactSource, D: PlatformDetector>(
    config: Config<R, S, D>,
    quiet: bool,
) -> Result<()> {
    let Config {
        runtime,
        source,
        detector,
        formula,
        bin_dir,
    } = config;

    let installer = Installer::new(runtime, source, detector);
    installer.install(&formula, &bin_dir).await?;

    if !is_on_path(&installer.runtime, &bin_dir) {
        warn!("{} is not in PATH", bin_dir.display());
        eprintln!(
            "Warning: {} is not in your PATH. Add it to run {} directly.",
            bin_dir.display(),
            formula.name
        );
    }

    if !quiet {
        if let Some(caveats) = &formula.caveats {
            println!();
            println!("{}", caveats.trim_end());
        }
    }

    Ok(())
}

/// Print which artifact would be installed on this host. No network access.
#[tracing::instrument(skip(runtime))]
pub fn resolve<R: Runtime>(runtime: R, formula_path: &Path, bin_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(runtime, formula_path, bin_dir)?;
    print!("{}", render_resolution(&config.formula, &config.detector, &config.bin_dir)?);
    Ok(())
}

pub fn render_resolution<D: PlatformDetector>(
    formula: &Formula,
    detector: &D,
    bin_dir: &Path,
) -> Result<String> {
    let resolved = resolve_artifact(formula, detector)?;
    Ok(format!(
        "formula:  {} {}\nplatform: {}\nurl:      {}\nsha256:   {}\ntarget:   {}\n",
        formula.name,
        formula.version,
        resolved.platform,
        resolved.descriptor.url,
        resolved.descriptor.sha256,
        bin_dir.join(&formula.name).display()
    ))
}

/// Re-run the smoke test against the installed binary.
#[tracing::instrument(skip(runtime, bin_dir))]
pub fn verify<R: Runtime>(runtime: R, formula_path: &Path, bin_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(runtime, formula_path, bin_dir)?;
    let path = config.bin_dir.join(&config.formula.name);

    if !config.runtime.exists(&path) {
        return Err(InstallError::Verification {
            args: config.formula.test.first().cloned().unwrap_or_default(),
            reason: format!(
                "{} is not installed in {}, install it first with: brewlet install",
                config.formula.name,
                config.bin_dir.display()
            ),
            path,
        }
        .into());
    }

    verify_installed(&config.runtime, &path, &config.formula.test)?;
    println!("    verified {}", path.display());
    Ok(())
}

/// Remove the installed binary.
#[tracing::instrument(skip(runtime, bin_dir))]
pub fn uninstall<R: Runtime>(runtime: R, formula_path: &Path, bin_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(runtime, formula_path, bin_dir)?;
    let path = remove_binary(&config.runtime, &config.bin_dir, &config.formula.name)?;
    println!("     removed {}", path.display());
    Ok(())
}

/// Print formula metadata and caveats.
#[tracing::instrument(skip(runtime))]
pub fn info<R: Runtime>(runtime: R, formula_path: &Path) -> Result<()> {
    let formula = Formula::load(&runtime, formula_path)?;
    print!("{}", render_info(&formula));
    Ok(())
}

pub fn render_info(formula: &Formula) -> String {
    let mut out = format!("{} {}\n", formula.name, formula.version);
    if let Some(description) = &formula.description {
        out.push_str(&format!("{}\n", description));
    }
    if let Some(homepage) = &formula.homepage {
        out.push_str(&format!("Homepage: {}\n", homepage));
    }

    out.push_str("Platforms:\n");
    for (platform, artifact) in &formula.artifacts {
        out.push_str(&format!("  {:<12} {}\n", platform.to_string(), artifact.url));
    }

    if let Some(caveats) = &formula.caveats {
        out.push('\n');
        out.push_str(caveats.trim_end());
        out.push('\n');
    }
    out
}
