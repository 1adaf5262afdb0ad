//! Runtime abstraction for system operations.
//!
//! Trait-based abstraction over the host system, enabling dependency
//! injection and testability.
//!
//! # Structure
//!
//! - `env` - Environment variables, home directory, privilege probe
//! - `fs` - File system operations (write, permissions, directories)
//! - `proc` - Subprocess invocation and PATH lookup

mod env;
mod fs;
mod proc;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

/// Captured result of a subprocess invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
    fn home_dir(&self) -> Option<PathBuf>;
    fn is_privileged(&self) -> bool;

    // File system
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    // Processes
    /// Locate an executable by searching the directories on PATH.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    /// Run a program to completion and capture its output.
    fn command_output(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir_impl()
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.find_executable_impl(name)
    }

    fn command_output(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        self.command_output_impl(program, args)
    }
}
