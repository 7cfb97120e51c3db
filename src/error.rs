//! Terminal error kinds of an install run.
//!
//! Operations return `anyhow::Result` and wrap one of these variants so the
//! CLI can map the failure to a distinct exit code. None of them is retried.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The formula is missing, malformed or incomplete.
    Config(String),
    /// The host (os, arch) pair has no artifact.
    UnsupportedPlatform { os: String, arch: String },
    /// Network failure or non-success HTTP status.
    Download { url: String, reason: String },
    /// Downloaded bytes do not hash to the expected digest.
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },
    /// Writing, renaming or chmod-ing the binary failed.
    Filesystem { path: PathBuf, reason: String },
    /// The installed binary failed its smoke test.
    Verification {
        path: PathBuf,
        args: Vec<String>,
        reason: String,
    },
}

impl InstallError {
    /// Process exit code reported by the CLI for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::Config(_) => 2,
            InstallError::UnsupportedPlatform { .. } => 3,
            InstallError::Download { .. } => 4,
            InstallError::Integrity { .. } => 5,
            InstallError::Filesystem { .. } => 6,
            InstallError::Verification { .. } => 7,
        }
    }

    /// Finds the first `InstallError` in an error chain.
    pub fn find(error: &anyhow::Error) -> Option<&InstallError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<InstallError>())
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, error: &anyhow::Error) -> Self {
        InstallError::Filesystem {
            path: path.into(),
            reason: format!("{:#}", error),
        }
    }
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::Config(msg) => write!(f, "Invalid formula: {}", msg),
            InstallError::UnsupportedPlatform { os, arch } => {
                write!(
                    f,
                    "Unsupported platform: {}/{}. Supported platforms are mac and linux on arm64 or amd64.",
                    os, arch
                )
            }
            InstallError::Download { url, reason } => {
                write!(f, "Failed to download {}: {}", url, reason)
            }
            InstallError::Integrity {
                url,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Checksum mismatch for {}: expected sha256 {}, got {}",
                    url, expected, actual
                )
            }
            InstallError::Filesystem { path, reason } => {
                write!(f, "Failed to install {}: {}", path.display(), reason)
            }
            InstallError::Verification { path, args, reason } => {
                write!(
                    f,
                    "Post-install check `{} {}` failed: {}",
                    path.display(),
                    args.join(" "),
                    reason
                )
            }
        }
    }
}

impl std::error::Error for InstallError {}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            InstallError::Config("x".into()),
            InstallError::UnsupportedPlatform {
                os: "windows".into(),
                arch: "x86_64".into(),
            },
            InstallError::Download {
                url: "u".into(),
                reason: "r".into(),
            },
            InstallError::Integrity {
                url: "u".into(),
                expected: "a".into(),
                actual: "b".into(),
            },
            InstallError::Filesystem {
                path: PathBuf::from("/p"),
                reason: "r".into(),
            },
            InstallError::Verification {
                path: PathBuf::from("/p"),
                args: vec!["--help".into()],
                reason: "r".into(),
            },
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0 && *c != 1));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_integrity_display_names_both_hashes() {
        let err = InstallError::Integrity {
            url: "https://example.com/tool".into(),
            expected: "aaaa".into(),
            actual: "bbbb".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/tool"));
        assert!(msg.contains("expected sha256 aaaa"));
        assert!(msg.contains("got bbbb"));
    }

    #[test]
    fn test_unsupported_platform_display() {
        let err = InstallError::UnsupportedPlatform {
            os: "freebsd".into(),
            arch: "riscv64".into(),
        };
        assert!(err.to_string().contains("freebsd/riscv64"));
    }

    #[test]
    fn test_find_through_context() {
        let err: anyhow::Result<()> = Err(anyhow::Error::from(InstallError::Download {
            url: "u".into(),
            reason: "timeout".into(),
        }));
        let err = err.context("Install failed").unwrap_err();

        let found = InstallError::find(&err).unwrap();
        assert_eq!(found.exit_code(), 4);
    }

    #[test]
    fn test_find_returns_none_for_foreign_errors() {
        let err = anyhow::anyhow!("something else");
        assert!(InstallError::find(&err).is_none());
    }
}
