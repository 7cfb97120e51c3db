//! Fetcher: downloads an artifact and checks it against its expected hash.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};

use crate::error::InstallError;
use crate::formula::{ArtifactDescriptor, Sha256Digest};
use crate::stage::{Progress, Stage};

/// Where artifact bytes come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Downloads `url` in full. Transport failures are `DownloadError`s.
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Artifact bytes whose SHA-256 matched the formula.
///
/// Only [`VerifiedArtifact::check`] constructs one.
#[derive(Debug)]
pub struct VerifiedArtifact {
    bytes: Vec<u8>,
    sha256: Sha256Digest,
}

impl VerifiedArtifact {
    /// Hashes `bytes` and accepts them only if they match `descriptor`.
    pub fn check(bytes: Vec<u8>, descriptor: &ArtifactDescriptor) -> Result<Self, InstallError> {
        let actual = Sha256Digest::of(&bytes);
        if actual != descriptor.sha256 {
            return Err(InstallError::Integrity {
                url: descriptor.url.clone(),
                expected: descriptor.sha256.to_string(),
                actual: actual.to_string(),
            });
        }

        debug!("sha256 {} verified for {}", actual, descriptor.url);
        Ok(Self {
            bytes,
            sha256: actual,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }
}

/// Downloads the artifact described by `descriptor` and verifies its hash.
///
/// Advances `progress` through `Downloading` and `VerifyingIntegrity`.
#[tracing::instrument(skip(source, descriptor, progress), fields(url = %descriptor.url))]
pub async fn fetch<S: ArtifactSource + ?Sized>(
    source: &S,
    descriptor: &ArtifactDescriptor,
    progress: &mut Progress,
) -> Result<VerifiedArtifact> {
    progress.advance(Stage::Downloading);
    info!("Downloading {}...", descriptor.url);
    let bytes = source
        .download(&descriptor.url)
        .await
        .map_err(|e| progress.fail(e))?;

    progress.advance(Stage::VerifyingIntegrity);
    let artifact = VerifiedArtifact::check(bytes, descriptor).map_err(|e| progress.fail(e))?;

    info!(
        "Downloaded {} bytes, sha256 {}",
        artifact.bytes().len(),
        artifact.sha256()
    );
    Ok(artifact)
}
