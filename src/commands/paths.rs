use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Resolve the bin directory the forest binary is installed into.
#[tracing::instrument(skip(runtime, bin_dir))]
pub fn resolve_bin_dir<R: Runtime>(runtime: &R, bin_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match bin_dir {
        Some(path) => path,
        None => default_bin_dir(runtime)?,
    };
    info!("Using bin directory: {}", dir.display());
    Ok(dir)
}

/// Default bin directory: the system location when running privileged,
/// otherwise a per-user one.
#[tracing::instrument(skip(runtime))]
pub fn default_bin_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if runtime.is_privileged() {
        Ok(system_bin_dir())
    } else {
        let home_dir = runtime
            .home_dir()
            .context("Could not find home directory")?;
        Ok(home_dir.join(".local").join("bin"))
    }
}

#[cfg(target_os = "windows")]
fn system_bin_dir() -> PathBuf {
    PathBuf::from(r"C:\Program Files\forest")
}

#[cfg(not(target_os = "windows"))]
fn system_bin_dir() -> PathBuf {
    PathBuf::from("/usr/local/bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_explicit_bin_dir_wins() {
        // No runtime expectations: an explicit path must not consult the
        // environment at all.
        let runtime = MockRuntime::new();

        let dir = resolve_bin_dir(&runtime, Some(PathBuf::from("/opt/tools/bin"))).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/tools/bin"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_privileged_default_is_system_dir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| true);

        let dir = resolve_bin_dir(&runtime, None).unwrap();
        assert_eq!(dir, PathBuf::from("/usr/local/bin"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unprivileged_default_is_under_home() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));

        let dir = resolve_bin_dir(&runtime, None).unwrap();
        assert_eq!(dir, PathBuf::from("/home/user/.local/bin"));
    }

    #[test]
    fn test_missing_home_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().returning(|| false);
        runtime.expect_home_dir().returning(|| None);

        assert!(resolve_bin_dir(&runtime, None).is_err());
    }
}
