// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qpdf process engine.
//
// Each run writes the input to a fresh scratch directory, invokes qpdf, reads
// the output back, and lets the directory drop. Scratch files are removed on
// every path out of `run`, including failures.
//
// qpdf receives its arguments through an owner-only `@file` in the scratch
// directory, so passwords never appear in the child's argv.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use folio_core::error::{FolioError, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::PdfEngine;
use super::args::QpdfArgs;

/// qpdf exit status for "succeeded with warnings"; the output is usable.
const EXIT_WARNINGS: i32 = 3;

/// Handle on a qpdf executable.
#[derive(Debug)]
pub struct QpdfEngine {
    binary: PathBuf,
    /// Version reported by `qpdf --version`; `Some` once initialised.
    version: Option<String>,
}

impl QpdfEngine {
    /// Create an uninitialised handle for `binary` (a path, or a bare name
    /// looked up on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            version: None,
        }
    }

    /// Probe the executable. Must succeed before [`PdfEngine::run`] is used.
    #[instrument(skip(self), fields(binary = %self.binary.display()))]
    pub async fn init(&mut self) -> Result<&str> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|err| {
                FolioError::EngineUnavailable(format!(
                    "cannot run {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            return Err(FolioError::EngineUnavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("qpdf")
            .trim()
            .to_string();
        info!(%version, "PDF engine ready");

        Ok(self.version.insert(version).as_str())
    }

    /// Release the handle. Further runs fail until `init` is called again.
    pub fn dispose(&mut self) {
        if self.version.take().is_some() {
            debug!(binary = %self.binary.display(), "PDF engine disposed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.version.is_some()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl PdfEngine for QpdfEngine {
    #[instrument(skip(self, input), fields(input_bytes = input.len()))]
    async fn run(&self, label: &str, input: &[u8], args: &QpdfArgs) -> Result<Vec<u8>> {
        if !self.is_ready() {
            return Err(FolioError::EngineNotInitialized);
        }

        let scratch = tempfile::tempdir()?;
        let input_path = scratch.path().join("input.pdf");
        let output_path = scratch.path().join("output.pdf");

        tokio::fs::write(&input_path, input).await?;
        let args_path = write_argument_file(
            scratch.path(),
            &args.argument_file(&input_path, &output_path)?,
        )
        .await?;

        let output = Command::new(&self.binary)
            .arg(at_file(&args_path))
            .output()
            .await
            .map_err(|err| {
                FolioError::EngineUnavailable(format!(
                    "cannot run {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(0) => {}
            Some(EXIT_WARNINGS) => warn!(label, warnings = %stderr.trim(), "qpdf reported warnings"),
            _ => {
                debug!(label, status = %output.status, "qpdf failed");
                return Err(classify_failure(&stderr, args.has_input_password()));
            }
        }

        let bytes = match tokio::fs::read(&output_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        if bytes.is_empty() {
            return Err(FolioError::EmptyOutput(label.to_string()));
        }

        debug!(label, output_bytes = bytes.len(), "qpdf run complete");
        Ok(bytes)
    }
}

/// Write the argument file readable by the owner only.
async fn write_argument_file(dir: &Path, contents: &str) -> Result<PathBuf> {
    let path = dir.join("args");
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(&path).await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await?;
    Ok(path)
}

/// `@<path>`: qpdf's "read arguments from this file".
fn at_file(path: &Path) -> OsString {
    let mut arg = OsString::from("@");
    arg.push(path);
    arg
}

/// Map qpdf's diagnostics to an error.
///
/// qpdf reports a missing password and a wrong one the same way ("invalid
/// password"), so whether the caller supplied one decides which it was.
pub(crate) fn classify_failure(stderr: &str, password_supplied: bool) -> FolioError {
    let lower = stderr.to_ascii_lowercase();

    if lower.contains("invalid password") || lower.contains("incorrect password") {
        if password_supplied {
            FolioError::InvalidPassword
        } else {
            FolioError::PasswordRequired
        }
    } else if lower.contains("password") || lower.contains("encrypted") {
        FolioError::PasswordRequired
    } else {
        let detail = stderr.trim();
        FolioError::Engine(if detail.is_empty() {
            "qpdf exited without output".to_string()
        } else {
            detail.to_string()
        })
    }
}
