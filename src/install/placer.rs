use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::download::VerifiedArtifact;
use crate::error::InstallError;
use crate::runtime::Runtime;

/// Mode of the installed binary (rwxr-xr-x).
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Hidden staging path next to the destination, so the final rename stays
/// on one file system.
pub fn staging_path(bin_dir: &Path, name: &str) -> PathBuf {
    bin_dir.join(format!(".{}.{}.partial", name, std::process::id()))
}

/// Places `artifact` at `<bin_dir>/<name>` with the executable bit set.
///
/// The bytes are written to a staging file and renamed over the destination,
/// so the destination holds either the previous binary or the complete new
/// one. On failure the staging file is removed and the destination is untouched.
#[tracing::instrument(skip(runtime, artifact))]
pub fn place_binary<R: Runtime>(
    runtime: &R,
    artifact: &VerifiedArtifact,
    bin_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let dest = bin_dir.join(name);

    if !runtime.exists(bin_dir) {
        debug!("Creating bin directory {:?}", bin_dir);
        runtime
            .create_dir_all(bin_dir)
            .map_err(|e| InstallError::filesystem(bin_dir, &e))?;
    } else if !runtime.is_dir(bin_dir) {
        return Err(InstallError::Filesystem {
            path: bin_dir.to_path_buf(),
            reason: "not a directory".to_string(),
        }
        .into());
    }

    let staging = staging_path(bin_dir, name);
    debug!("Staging {} bytes at {:?}", artifact.bytes().len(), staging);

    let staged = runtime
        .write(&staging, artifact.bytes())
        .and_then(|_| runtime.set_permissions(&staging, EXECUTABLE_MODE))
        .and_then(|_| runtime.rename(&staging, &dest));

    if let Err(e) = staged {
        if runtime.exists(&staging) {
            if let Err(cleanup) = runtime.remove_file(&staging) {
                warn!("Failed to remove staging file {:?}: {}", staging, cleanup);
            }
        }
        return Err(InstallError::filesystem(&dest, &e).into());
    }

    info!("Installed {:?}", dest);
    Ok(dest)
}
