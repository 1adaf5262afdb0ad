//! Failure conditions of an installation run.
//!
//! Every variant is fatal: the run aborts on the first failure and the
//! underlying cause (HTTP status, digest pair, OS error text, subprocess
//! output) is surfaced verbatim. Nothing is retried and nothing is
//! downgraded to a warning.

use crate::platform::{Arch, Os};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("no release artifact is published for {os}/{arch}")]
    UnsupportedPlatform { os: Os, arch: Arch },

    #[error("release manifest is invalid: {reason}")]
    InvalidManifest { reason: String },

    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("checksum mismatch for {asset}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        asset: String,
        expected: String,
        actual: String,
    },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("installed binary {binary} failed its post-install check: {detail}")]
    PostInstallVerificationFailed { binary: PathBuf, detail: String },

    #[error("required dependency `{name}` was not found on PATH")]
    MissingDependency { name: String },
}
