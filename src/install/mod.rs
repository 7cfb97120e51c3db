use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::{
    download::{ArtifactSource, fetch},
    error::InstallError,
    formula::{Formula, Sha256Digest},
    platform::{PlatformDetector, PlatformKey},
    resolver::resolve,
    runtime::Runtime,
    stage::{Progress, Stage},
    verify::verify_installed,
};

mod placer;

pub use placer::{EXECUTABLE_MODE, place_binary, staging_path};

/// What a successful install did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub platform: PlatformKey,
    pub url: String,
    pub sha256: Sha256Digest,
    pub path: PathBuf,
}

pub struct Installer<R: Runtime, S: ArtifactSource, D: PlatformDetector> {
    pub runtime: R,
    pub source: S,
    pub detector: D,
}

impl<R: Runtime, S: ArtifactSource, D: PlatformDetector> Installer<R, S, D> {
    #[tracing::instrument(skip(runtime, source, detector))]
    pub fn new(runtime: R, source: S, detector: D) -> Self {
        Self {
            runtime,
            source,
            detector,
        }
    }

    /// Runs the whole pipeline for `formula` into `bin_dir`.
    ///
    /// Stops at the first failing stage; nothing is retried. A failed smoke
    /// test leaves the placed binary where it is.
    #[tracing::instrument(skip(self, formula), fields(formula = %formula.name))]
    pub async fn install(&self, formula: &Formula, bin_dir: &Path) -> Result<InstallReport> {
        let mut progress = Progress::new();
        let report = self.run(formula, bin_dir, &mut progress).await;
        debug!("Install path: {:?}", progress.history());
        report
    }

    async fn run(
        &self,
        formula: &Formula,
        bin_dir: &Path,
        progress: &mut Progress,
    ) -> Result<InstallReport> {
        println!("   resolving {} {}", formula.name, formula.version);
        progress.advance(Stage::Resolving);
        let resolved = resolve(formula, &self.detector).map_err(|e| progress.fail(e))?;

        println!(" downloading {} ({})", resolved.descriptor.url, resolved.platform);
        let artifact = fetch(&self.source, &resolved.descriptor, progress).await?;

        let dest = bin_dir.join(&formula.name);
        println!("  installing {}", dest.display());
        progress.advance(Stage::Placing);
        let path = place_binary(&self.runtime, &artifact, bin_dir, &formula.name)
            .map_err(|e| progress.fail(e))?;

        println!("     testing {}", path.display());
        progress.advance(Stage::VerifyingInstall);
        verify_installed(&self.runtime, &path, &formula.test).map_err(|e| progress.fail(e))?;

        progress.advance(Stage::Done);
        println!(
            "   installed {} {} {}",
            formula.name,
            formula.version,
            path.display()
        );
        Ok(InstallReport {
            platform: resolved.platform,
            url: resolved.descriptor.url,
            sha256: artifact.sha256().clone(),
            path,
        })
    }
}

/// Removes `<bin_dir>/<name>`.
#[tracing::instrument(skip(runtime))]
pub fn uninstall<R: Runtime>(runtime: &R, bin_dir: &Path, name: &str) -> Result<PathBuf> {
    let path = bin_dir.join(name);

    if !runtime.exists(&path) {
        anyhow::bail!("{} is not installed in {}", name, bin_dir.display());
    }
    if runtime.is_dir(&path) {
        return Err(InstallError::Filesystem {
            path,
            reason: "is a directory, refusing to remove".to_string(),
        }
        .into());
    }

    runtime
        .remove_file(&path)
        .map_err(|e| InstallError::filesystem(&path, &e))?;

    info!("Removed {:?}", path);
    Ok(path)
}
