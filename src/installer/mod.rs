//! The install sequence for the forest binary.
//!
//! A run is strictly linear: select the artifact for the target platform,
//! check host dependencies, fetch and digest-check the artifact, write it
//! into the bin directory, then smoke-test the installed executable. Each
//! step either succeeds and advances or fails the whole run; nothing is
//! written before the checksum matches, so there is no partial install to
//! roll back.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::checksum::sha256_hex;
use crate::error::InstallError;
use crate::http::ArtifactFetcher;
use crate::manifest::{Manifest, ReleaseArtifact};
use crate::platform::{Arch, Os};
use crate::runtime::Runtime;

/// The help line the installed binary must print. This is forest's literal
/// `--help` output ("manager" included); the check matches it verbatim.
pub const EXPECTED_HELP_LINE: &str =
    "Convention-over-configuration CLI tool to manager git worktrees";

/// External executables forest needs on the host at runtime. The installer
/// only declares them; it never installs them.
const RUNTIME_DEPENDENCIES: &[&str] = &["git"];

const EXECUTABLE_MODE: u32 = 0o755;

pub struct Installer<'a, R: Runtime, F: ArtifactFetcher> {
    runtime: &'a R,
    fetcher: &'a F,
    manifest: &'a Manifest,
}

impl<'a, R: Runtime, F: ArtifactFetcher> Installer<'a, R, F> {
    pub fn new(runtime: &'a R, fetcher: &'a F, manifest: &'a Manifest) -> Self {
        Self {
            runtime,
            fetcher,
            manifest,
        }
    }

    /// Pure lookup of the release artifact for an (os, arch) pair.
    #[tracing::instrument(skip(self))]
    pub fn select_artifact(&self, os: Os, arch: Arch) -> Result<&ReleaseArtifact, InstallError> {
        let artifact = self.manifest.select(os, arch)?;
        debug!("Selected artifact {} for {}/{}", artifact.asset, os, arch);
        Ok(artifact)
    }

    /// Probe the host PATH for the executables forest needs at runtime.
    #[tracing::instrument(skip(self))]
    pub fn check_dependencies(&self) -> Result<(), InstallError> {
        for name in RUNTIME_DEPENDENCIES {
            match self.runtime.find_executable(name) {
                Some(path) => debug!("Found dependency `{}` at {}", name, path.display()),
                None => {
                    return Err(InstallError::MissingDependency {
                        name: (*name).to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Download the artifact and verify its digest.
    ///
    /// Returns the retrieved bytes unchanged. The download is not retried;
    /// whatever invoked the installer owns that policy.
    #[tracing::instrument(skip(self, artifact), fields(asset = %artifact.asset))]
    pub async fn fetch_and_verify(
        &self,
        artifact: &ReleaseArtifact,
    ) -> Result<Vec<u8>, InstallError> {
        let url = self.manifest.download_url(artifact);
        info!("Downloading {}...", url);

        let bytes = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| InstallError::DownloadFailed {
                url: url.clone(),
                reason: format!("{:#}", e),
            })?;

        let actual = sha256_hex(&bytes);
        if actual != artifact.sha256 {
            return Err(InstallError::ChecksumMismatch {
                asset: artifact.asset.clone(),
                expected: artifact.sha256.clone(),
                actual,
            });
        }

        info!("Checksum verified ({} bytes)", bytes.len());
        Ok(bytes)
    }

    /// Write the verified bytes into the bin directory with executable
    /// permission. Overwrites an existing install of the same binary.
    #[tracing::instrument(skip(self, bytes))]
    pub fn install(&self, bytes: &[u8], bin_dir: &Path) -> Result<PathBuf, InstallError> {
        self.runtime
            .create_dir_all(bin_dir)
            .map_err(|e| write_failed(bin_dir, e))?;

        let install_path = self.manifest.install_path(bin_dir);
        info!("Installing to {}...", install_path.display());

        self.runtime
            .write(&install_path, bytes)
            .map_err(|e| write_failed(&install_path, e))?;
        self.runtime
            .set_permissions(&install_path, EXECUTABLE_MODE)
            .map_err(|e| write_failed(&install_path, e))?;

        Ok(install_path)
    }

    /// Smoke-test the installed binary: `forest --help` must exit
    /// successfully and print the expected description line. This confirms
    /// the binary runs, not that its worktree logic works.
    #[tracing::instrument(skip(self))]
    pub fn verify_install(&self, install_path: &Path) -> Result<(), InstallError> {
        let output = self
            .runtime
            .command_output(install_path, &["--help".to_string()])
            .map_err(|e| InstallError::PostInstallVerificationFailed {
                binary: install_path.to_path_buf(),
                detail: format!("{:#}", e),
            })?;

        if !output.success {
            return Err(InstallError::PostInstallVerificationFailed {
                binary: install_path.to_path_buf(),
                detail: format!("`--help` exited with failure: {}", output.stderr.trim()),
            });
        }

        if !output.stdout.contains(EXPECTED_HELP_LINE) {
            return Err(InstallError::PostInstallVerificationFailed {
                binary: install_path.to_path_buf(),
                detail: format!(
                    "`--help` output did not contain {:?}; got: {}",
                    EXPECTED_HELP_LINE,
                    output.stdout.trim()
                ),
            });
        }

        info!("Post-install check passed");
        Ok(())
    }

    /// The full sequence: select → dependency preflight → fetch+verify →
    /// install → post-install check. Returns the installed path.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, os: Os, arch: Arch, bin_dir: &Path) -> Result<PathBuf, InstallError> {
        let artifact = self.select_artifact(os, arch)?;
        self.check_dependencies()?;
        let bytes = self.fetch_and_verify(artifact).await?;
        let install_path = self.install(&bytes, bin_dir)?;
        self.verify_install(&install_path)?;
        info!(
            "Installed {} {} to {}",
            self.manifest.bin_name,
            self.manifest.version,
            install_path.display()
        );
        Ok(install_path)
    }
}

fn write_failed(path: &Path, e: anyhow::Error) -> InstallError {
    InstallError::WriteFailed {
        path: path.to_path_buf(),
        reason: format!("{:#}", e),
    }
}
