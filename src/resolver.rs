//! Installer Resolver: picks the artifact for the host platform.
//!
//! Pure lookup; never touches the network.

use log::info;

use crate::error::InstallError;
use crate::formula::{ArtifactDescriptor, Formula};
use crate::platform::{PlatformDetector, PlatformKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub platform: PlatformKey,
    pub descriptor: ArtifactDescriptor,
}

#[tracing::instrument(skip(formula, detector))]
pub fn resolve<D: PlatformDetector + ?Sized>(
    formula: &Formula,
    detector: &D,
) -> Result<ResolvedArtifact, InstallError> {
    let host = detector.detect();
    let platform = PlatformKey::from_platform(&host)?;

    // A validated formula covers every key; a miss means it was built by hand.
    let descriptor = formula.artifact(&platform).cloned().ok_or_else(|| {
        InstallError::Config(format!("no artifact for platform {}", platform))
    })?;

    info!(
        "Resolved {} {} for {} ({}): {}",
        formula.name, formula.version, platform, host, descriptor.url
    );

    Ok(ResolvedArtifact {
        platform,
        descriptor,
    })
}
