//! Post-install verification: the installed binary must answer its smoke test.

use anyhow::Result;
use log::{debug, info};
use std::path::Path;

use crate::error::InstallError;
use crate::runtime::Runtime;

const STDERR_EXCERPT_LEN: usize = 200;

/// Runs `binary` once per entry in `invocations`; every run must exit 0.
#[tracing::instrument(skip(runtime, invocations))]
pub fn verify_installed<R: Runtime>(
    runtime: &R,
    binary: &Path,
    invocations: &[Vec<String>],
) -> Result<()> {
    for args in invocations {
        debug!("Running {} {}", binary.display(), args.join(" "));

        let failure = |reason: String| InstallError::Verification {
            path: binary.to_path_buf(),
            args: args.clone(),
            reason,
        };

        let output = runtime
            .run_command(binary, args)
            .map_err(|e| failure(format!("cannot execute: {:#}", e)))?;

        if !output.success() {
            let status = match output.code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by a signal".to_string(),
            };
            let stderr = output.stderr.trim();
            let reason = if stderr.is_empty() {
                status
            } else {
                format!("{}: {}", status, excerpt(stderr))
            };
            return Err(failure(reason).into());
        }
    }

    info!("{} passed {} check(s)", binary.display(), invocations.len());
    Ok(())
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(STDERR_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
