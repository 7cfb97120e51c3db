use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    download::ArtifactSource,
    formula::Formula,
    http::HttpClient,
    platform::{HostPlatformDetector, PlatformDetector},
    runtime::Runtime,
};

use super::paths::get_bin_dir;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn user_agent() -> String {
    format!("brewlet/{}", env!("BREWLET_VERSION"))
}

pub struct Config<R: Runtime, S: ArtifactSource, D: PlatformDetector> {
    pub runtime: R,
    pub source: S,
    pub detector: D,
    pub formula: Formula,
    pub bin_dir: PathBuf,
}

impl<R: Runtime> Config<R, HttpClient, HostPlatformDetector> {
    /// Loads the formula and prepares the HTTP client for a real run.
    pub fn new(runtime: R, formula_path: &Path, bin_dir: Option<PathBuf>) -> Result<Self> {
        let formula = Formula::load(&runtime, formula_path)?;
        let bin_dir = get_bin_dir(&runtime, bin_dir)?;

        let client = Client::builder()
            .user_agent(user_agent())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            runtime,
            source: HttpClient::new(client),
            detector: HostPlatformDetector,
            formula,
            bin_dir,
        })
    }
}
