//! Formula: the declarative description of one installable binary.
//!
//! A formula is read from JSON and validated in full before anything else
//! happens. Every supported `PlatformKey` must have exactly one artifact with
//! a real SHA-256; anything less is a configuration error.

mod digest;

use anyhow::{Context, Result};
use log::debug;
use reqwest::Url;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::InstallError;
use crate::platform::PlatformKey;
use crate::runtime::Runtime;

pub use digest::Sha256Digest;

/// Download location and expected hash for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub url: String,
    pub sha256: Sha256Digest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub artifacts: BTreeMap<PlatformKey, ArtifactDescriptor>,
    /// Argument lists the installed binary is smoke-tested with.
    pub test: Vec<Vec<String>>,
    pub caveats: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFormula {
    name: String,
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    artifacts: BTreeMap<String, RawArtifact>,
    #[serde(default)]
    test: Option<Vec<Vec<String>>>,
    #[serde(default)]
    caveats: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArtifact {
    url: String,
    sha256: String,
}

fn default_test() -> Vec<Vec<String>> {
    vec![vec!["--version".to_string()], vec!["--help".to_string()]]
}

fn config_error(msg: impl Into<String>) -> anyhow::Error {
    InstallError::Config(msg.into()).into()
}

impl Formula {
    /// Loads and validates a formula file.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        debug!("Loading formula from {:?}", path);
        let content = runtime
            .read_to_string(path)
            .map_err(|e| config_error(format!("cannot read {}: {:#}", path.display(), e)))?;
        Self::parse(&content).with_context(|| format!("Formula {}", path.display()))
    }

    /// Parses and validates formula JSON.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawFormula = serde_json::from_str(content)
            .map_err(|e| config_error(format!("malformed JSON: {}", e)))?;
        Self::validate(raw)
    }

    fn validate(raw: RawFormula) -> Result<Self> {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(config_error("name must not be empty"));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(config_error(format!(
                "name '{}' must be a plain file name",
                name
            )));
        }

        let version = raw.version.trim().to_string();
        if version.is_empty() {
            return Err(config_error("version must not be empty"));
        }

        let mut artifacts = BTreeMap::new();
        let mut seen_urls = HashSet::new();
        for (key, artifact) in raw.artifacts {
            let platform: PlatformKey = key
                .parse()
                .map_err(|e| config_error(format!("artifact key: {:#}", e)))?;

            let url = artifact.url.trim().to_string();
            let parsed = Url::parse(&url)
                .map_err(|e| config_error(format!("{}: invalid url '{}': {}", platform, url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(config_error(format!(
                    "{}: url '{}' must use http or https",
                    platform, url
                )));
            }
            if !seen_urls.insert(url.clone()) {
                return Err(config_error(format!(
                    "{}: url '{}' is used by more than one platform",
                    platform, url
                )));
            }

            let sha256 = Sha256Digest::new(&artifact.sha256)
                .map_err(|e| config_error(format!("{}: {:#}", platform, e)))?;

            let descriptor = ArtifactDescriptor { url, sha256 };
            if artifacts.insert(platform, descriptor).is_some() {
                return Err(config_error(format!(
                    "platform {} is declared more than once",
                    platform
                )));
            }
        }

        let missing: Vec<String> = PlatformKey::ALL
            .iter()
            .filter(|key| !artifacts.contains_key(key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(config_error(format!(
                "no artifact for platform(s): {}",
                missing.join(", ")
            )));
        }

        let test = match raw.test {
            None => default_test(),
            Some(test) if test.is_empty() => {
                return Err(config_error("test must list at least one invocation"));
            }
            Some(test) => test,
        };

        Ok(Self {
            name,
            version,
            description: raw.description,
            homepage: raw.homepage,
            artifacts,
            test,
            caveats: raw.caveats,
        })
    }

    pub fn artifact(&self, platform: &PlatformKey) -> Option<&ArtifactDescriptor> {
        self.artifacts.get(platform)
    }
}
