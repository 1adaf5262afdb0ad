//! The release manifest: one version of forest, one immutable set of
//! downloadable artifacts.
//!
//! The built-in manifest is embedded at compile time; its digests are
//! stamped in when a release is published. An alternative manifest can be
//! loaded from a JSON file via `--manifest`, which is also the extension
//! point for platforms the published releases do not cover yet.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::checksum::is_valid_digest;
use crate::error::InstallError;
use crate::platform::{Arch, Os};

const BUILTIN_MANIFEST: &str = include_str!("../../manifest.json");

/// One downloadable release artifact for a specific (os, arch) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseArtifact {
    pub os: Os,
    pub arch: Arch,
    /// Asset file name within the release (e.g. "forest-macos-x86_64").
    pub asset: String,
    /// Expected SHA-256 of the asset, lowercase hex.
    pub sha256: String,
}

/// The full artifact table for one published release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Upstream project in "owner/repo" form.
    pub project: String,
    /// Release version without the leading "v" (e.g. "0.1.0").
    pub version: String,
    /// Base URL the versioned download path is appended to.
    pub base_url: String,
    /// Name the binary is installed under.
    pub bin_name: String,
    pub artifacts: Vec<ReleaseArtifact>,
}

impl Manifest {
    /// The manifest baked into this build.
    pub fn builtin() -> Result<Self, InstallError> {
        Self::from_json(BUILTIN_MANIFEST)
    }

    /// Parse and validate a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, InstallError> {
        let manifest: Manifest =
            serde_json::from_str(text).map_err(|e| InstallError::InvalidManifest {
                reason: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Select the artifact for an (os, arch) pair.
    ///
    /// Pure lookup: performs no network or filesystem action on any path,
    /// including the failing one.
    pub fn select(&self, os: Os, arch: Arch) -> Result<&ReleaseArtifact, InstallError> {
        self.artifacts
            .iter()
            .find(|a| a.os == os && a.arch == arch)
            .ok_or(InstallError::UnsupportedPlatform { os, arch })
    }

    /// The full download URL for an artifact of this release.
    pub fn download_url(&self, artifact: &ReleaseArtifact) -> String {
        format!(
            "{}/v{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            artifact.asset
        )
    }

    /// Where the binary lands under the given bin directory.
    pub fn install_path(&self, bin_dir: &Path) -> PathBuf {
        bin_dir.join(&self.bin_name)
    }

    fn validate(&self) -> Result<(), InstallError> {
        if self.version.is_empty() {
            return Err(invalid("version must not be empty"));
        }
        if self.base_url.is_empty() {
            return Err(invalid("base_url must not be empty"));
        }
        if self.bin_name.is_empty() {
            return Err(invalid("bin_name must not be empty"));
        }
        if self.artifacts.is_empty() {
            return Err(invalid("manifest lists no artifacts"));
        }

        let mut seen: HashSet<(Os, Arch)> = HashSet::new();
        for artifact in &self.artifacts {
            if artifact.asset.is_empty() {
                return Err(invalid(&format!(
                    "artifact for {}/{} has an empty asset name",
                    artifact.os, artifact.arch
                )));
            }
            if !is_valid_digest(&artifact.sha256) {
                return Err(invalid(&format!(
                    "artifact {} has a malformed sha256 digest",
                    artifact.asset
                )));
            }
            if !seen.insert((artifact.os, artifact.arch)) {
                return Err(invalid(&format!(
                    "duplicate artifact entry for {}/{}",
                    artifact.os, artifact.arch
                )));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> InstallError {
    InstallError::InvalidManifest {
        reason: reason.to_string(),
    }
}
