//! Host platform detection.
//!
//! Detection is kept separate from artifact selection so that selection can
//! be exercised with injected values (the `--os`/`--arch` overrides and the
//! unit tests both rely on this).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating systems an artifact can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Macos,
    Linux,
    Windows,
}

/// CPU architectures an artifact can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86_64,
    Aarch64,
}

/// The (os, arch) pair an installation run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the current platform at compile time.
    ///
    /// Returns `None` on hosts this installer has no notion of (e.g. a BSD,
    /// or a 32-bit architecture); callers surface that as an unsupported
    /// platform rather than guessing.
    pub fn detect() -> Option<Self> {
        Some(Self {
            os: Self::detect_os()?,
            arch: Self::detect_arch()?,
        })
    }

    fn detect_os() -> Option<Os> {
        #[cfg(target_os = "macos")]
        {
            Some(Os::Macos)
        }
        #[cfg(target_os = "linux")]
        {
            Some(Os::Linux)
        }
        #[cfg(target_os = "windows")]
        {
            Some(Os::Windows)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    fn detect_arch() -> Option<Arch> {
        #[cfg(target_arch = "x86_64")]
        {
            Some(Arch::X86_64)
        }
        #[cfg(target_arch = "aarch64")]
        {
            Some(Arch::Aarch64)
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            None
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Os::Macos => "macos",
            Os::Linux => "linux",
            Os::Windows => "windows",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" => Ok(Os::Macos),
            "linux" => Ok(Os::Linux),
            "windows" => Ok(Os::Windows),
            other => Err(format!("unknown operating system: {}", other)),
        }
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" | "intel" => Ok(Arch::X86_64),
            "aarch64" | "arm64" | "arm" => Ok(Arch::Aarch64),
            other => Err(format!("unknown architecture: {}", other)),
        }
    }
}
