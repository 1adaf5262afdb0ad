//! One function per CLI subcommand.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::http::HttpClient;
use crate::installer::Installer;
use crate::manifest::Manifest;
use crate::platform::{Arch, Os, Platform};
use crate::runtime::Runtime;

pub mod paths;

use paths::resolve_bin_dir;

/// Global CLI inputs shared by every subcommand.
#[derive(Debug, Default)]
pub struct Options {
    pub bin_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub os: Option<Os>,
    pub arch: Option<Arch>,
}

/// Download, verify and install the forest binary.
#[tracing::instrument(skip(runtime, opts))]
pub async fn install<R: Runtime>(runtime: &R, opts: Options) -> Result<()> {
    let manifest = load_manifest(runtime, &opts)?;
    let (os, arch) = target_platform(&opts)?;
    let bin_dir = resolve_bin_dir(runtime, opts.bin_dir)?;

    let fetcher = HttpClient::with_default_timeout()?;
    let installer = Installer::new(runtime, &fetcher, &manifest);
    let install_path = installer.run(os, arch, &bin_dir).await?;

    println!(
        "Installed {} {} to {}",
        manifest.bin_name,
        manifest.version,
        install_path.display()
    );
    Ok(())
}

/// Preflight only: report the artifact, the git dependency and the bin
/// directory without touching the network or the filesystem.
#[tracing::instrument(skip(runtime, opts))]
pub fn check<R: Runtime>(runtime: &R, opts: Options) -> Result<()> {
    let manifest = load_manifest(runtime, &opts)?;
    let (os, arch) = target_platform(&opts)?;
    let bin_dir = resolve_bin_dir(runtime, opts.bin_dir)?;

    let artifact = manifest.select(os, arch)?;
    println!("platform: {}/{}", os, arch);
    println!("artifact: {}", artifact.asset);

    let git = runtime
        .find_executable("git")
        .ok_or(crate::error::InstallError::MissingDependency {
            name: "git".to_string(),
        })?;
    println!("git:      {}", git.display());
    println!("bin dir:  {}", bin_dir.display());
    Ok(())
}

/// Print the release artifact selected for a platform.
#[tracing::instrument(skip(runtime, opts))]
pub fn show<R: Runtime>(runtime: &R, opts: Options) -> Result<()> {
    let manifest = load_manifest(runtime, &opts)?;
    let (os, arch) = target_platform(&opts)?;

    let artifact = manifest.select(os, arch)?;
    println!(
        "{} {} ({}/{})",
        manifest.bin_name, manifest.version, os, arch
    );
    println!("url:    {}", manifest.download_url(artifact));
    println!("sha256: {}", artifact.sha256);
    Ok(())
}

/// Re-run the post-install smoke test against an existing install.
#[tracing::instrument(skip(runtime, opts))]
pub fn verify<R: Runtime>(runtime: &R, opts: Options) -> Result<()> {
    let manifest = load_manifest(runtime, &opts)?;
    let bin_dir = resolve_bin_dir(runtime, opts.bin_dir)?;
    let install_path = manifest.install_path(&bin_dir);

    if !runtime.exists(&install_path) {
        anyhow::bail!(
            "{} is not installed (expected it at {})",
            manifest.bin_name,
            install_path.display()
        );
    }

    let fetcher = HttpClient::with_default_timeout()?;
    let installer = Installer::new(runtime, &fetcher, &manifest);
    installer.verify_install(&install_path)?;

    println!("{} at {} looks healthy", manifest.bin_name, install_path.display());
    Ok(())
}

fn load_manifest<R: Runtime>(runtime: &R, opts: &Options) -> Result<Manifest> {
    let mut manifest = match &opts.manifest_path {
        Some(path) => {
            debug!("Loading manifest from {}", path.display());
            let text = runtime
                .read_to_string(path)
                .with_context(|| format!("Failed to read manifest {}", path.display()))?;
            Manifest::from_json(&text)?
        }
        None => Manifest::builtin()?,
    };

    if let Some(base_url) = &opts.base_url {
        debug!("Overriding download base URL with {}", base_url);
        manifest.base_url = base_url.clone();
    }
    Ok(manifest)
}

fn target_platform(opts: &Options) -> Result<(Os, Arch)> {
    let detected = Platform::detect();
    let os = opts
        .os
        .or(detected.map(|p| p.os))
        .context("Could not detect the host operating system; pass --os")?;
    let arch = opts
        .arch
        .or(detected.map(|p| p.arch))
        .context("Could not detect the host architecture; pass --arch")?;
    Ok((os, arch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::Path;

    fn manifest_json(sha256: &str) -> String {
        format!(
            r#"{{
                "project": "tcione/forest",
                "version": "0.1.0",
                "base_url": "https://github.com/tcione/forest/releases/download",
                "bin_name": "forest",
                "artifacts": [
                    {{ "os": "macos", "arch": "x86_64", "asset": "forest-macos-x86_64", "sha256": "{}" }}
                ]
            }}"#,
            sha256
        )
    }

    #[test]
    fn test_load_manifest_builtin_by_default() {
        let runtime = MockRuntime::new();
        let manifest = load_manifest(&runtime, &Options::default()).unwrap();
        assert_eq!(manifest.project, "tcione/forest");
    }

    #[test]
    fn test_load_manifest_from_file_with_base_url_override() {
        let mut runtime = MockRuntime::new();
        let json = manifest_json(&"a".repeat(64));
        runtime
            .expect_read_to_string()
            .with(eq(Path::new("/tmp/manifest.json").to_path_buf()))
            .returning(move |_| Ok(json.clone()));

        let opts = Options {
            manifest_path: Some(PathBuf::from("/tmp/manifest.json")),
            base_url: Some("http://127.0.0.1:1234".into()),
            ..Options::default()
        };

        let manifest = load_manifest(&runtime, &opts).unwrap();
        assert_eq!(manifest.base_url, "http://127.0.0.1:1234");
        assert_eq!(manifest.version, "0.1.0");
    }

    #[test]
    fn test_load_manifest_rejects_invalid_file() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("{ not json".to_string()));

        let opts = Options {
            manifest_path: Some(PathBuf::from("/tmp/broken.json")),
            ..Options::default()
        };

        assert!(load_manifest(&runtime, &opts).is_err());
    }

    #[test]
    fn test_target_platform_overrides_win() {
        let opts = Options {
            os: Some(Os::Macos),
            arch: Some(Arch::Aarch64),
            ..Options::default()
        };

        let (os, arch) = target_platform(&opts).unwrap();
        assert_eq!(os, Os::Macos);
        assert_eq!(arch, Arch::Aarch64);
    }

    #[test]
    fn test_check_reports_missing_git() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));
        runtime
            .expect_find_executable()
            .with(eq("git"))
            .returning(|_| None);

        let opts = Options {
            os: Some(Os::Macos),
            arch: Some(Arch::X86_64),
            ..Options::default()
        };

        let err = check(&runtime, opts).unwrap_err();
        assert!(err.to_string().contains("`git`"));
    }

    #[test]
    fn test_check_rejects_unsupported_platform_before_git_probe() {
        // Strict mock apart from bin-dir resolution: the platform lookup
        // must fail before the PATH probe happens.
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));

        let opts = Options {
            os: Some(Os::Linux),
            arch: Some(Arch::X86_64),
            ..Options::default()
        };

        let err = check(&runtime, opts).unwrap_err();
        assert!(err.to_string().contains("linux/x86_64"));
    }

    #[test]
    fn test_verify_requires_an_existing_install() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));
        runtime.expect_exists().returning(|_| false);

        let err = verify(&runtime, Options::default()).unwrap_err();
        assert!(err.to_string().contains("not installed"));
    }
}
