use anyhow::Result;
use clap::Parser;
use forestup::commands::{self, Options};
use forestup::platform::{Arch, Os};
use forestup::runtime::RealRuntime;
use std::path::PathBuf;

/// forestup - installer for the forest git-worktree CLI
///
/// Downloads the prebuilt forest binary published on GitHub, verifies its
/// SHA-256 checksum, and installs it into a bin directory on this machine.
/// forest itself needs a `git` executable on PATH; forestup checks for it
/// but does not install it.
#[derive(Parser, Debug)]
#[command(author, version = env!("FORESTUP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Install directory for the forest binary (also via FORESTUP_BIN_DIR)
    #[arg(
        long = "bin-dir",
        short = 'b',
        env = "FORESTUP_BIN_DIR",
        value_name = "PATH",
        global = true
    )]
    bin_dir: Option<PathBuf>,

    /// Load the release manifest from a JSON file instead of the built-in one
    #[arg(long = "manifest", value_name = "PATH", global = true)]
    manifest: Option<PathBuf>,

    /// Override the manifest's download base URL (mirrors)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Override the detected operating system (macos|linux|windows)
    #[arg(long = "os", value_name = "OS", global = true)]
    os: Option<Os>,

    /// Override the detected CPU architecture (x86_64|aarch64)
    #[arg(long = "arch", value_name = "ARCH", global = true)]
    arch: Option<Arch>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download, verify and install the forest binary
    Install,

    /// Preflight only: platform support, git availability, bin directory
    Check,

    /// Print the release artifact selected for a platform
    Show,

    /// Re-run the post-install smoke test against an existing install
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let opts = Options {
        bin_dir: cli.bin_dir,
        manifest_path: cli.manifest,
        base_url: cli.base_url,
        os: cli.os,
        arch: cli.arch,
    };

    match cli.command {
        Commands::Install => commands::install(&runtime, opts).await?,
        Commands::Check => commands::check(&runtime, opts)?,
        Commands::Show => commands::show(&runtime, opts)?,
        Commands::Verify => commands::verify(&runtime, opts)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from(["forestup", "install"]).unwrap();
        assert!(matches!(cli.command, Commands::Install));
        assert_eq!(cli.bin_dir, None);
    }

    #[test]
    fn test_cli_bin_dir_parsing() {
        let cli =
            Cli::try_parse_from(["forestup", "install", "--bin-dir", "/tmp/bin"]).unwrap();
        assert_eq!(cli.bin_dir, Some(PathBuf::from("/tmp/bin")));
    }

    #[test]
    fn test_cli_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["forestup", "--bin-dir", "/tmp/bin", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.bin_dir, Some(PathBuf::from("/tmp/bin")));
    }

    #[test]
    fn test_cli_platform_overrides() {
        let cli = Cli::try_parse_from([
            "forestup", "show", "--os", "macos", "--arch", "arm64",
        ])
        .unwrap();
        assert_eq!(cli.os, Some(Os::Macos));
        assert_eq!(cli.arch, Some(Arch::Aarch64));
    }

    #[test]
    fn test_cli_rejects_unknown_arch() {
        assert!(Cli::try_parse_from(["forestup", "show", "--arch", "sparc"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["forestup"]).is_err());
    }
}
