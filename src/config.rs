//! Run configuration.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::paths::{absolute_binary_path, excludelist_path, shared_libs_dir};

/// Dependency report tool used when `LEVISO_BUNDLE_LDD` is unset.
pub const DEFAULT_LDD: &str = "ldd";

/// Overrides the dependency report tool.
pub const LDD_ENV: &str = "LEVISO_BUNDLE_LDD";

/// Overrides the excludelist location.
pub const EXCLUDELIST_ENV: &str = "LEVISO_BUNDLE_EXCLUDELIST";

/// Everything one bundling run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute path to the binary being bundled.
    pub binary: PathBuf,
    /// `<binary dir>/shared_libs`, wiped and refilled on every run.
    pub dest_dir: PathBuf,
    /// Excludelist read for this run (`<install dir>/excludelist` unless overridden).
    pub excludelist: PathBuf,
    /// Program producing an ldd-style report for `binary`.
    pub ldd: String,
}

impl Config {
    /// Build a config from the process environment.
    ///
    /// `install_dir` is where the bundler is installed; the excludelist is
    /// expected next to it unless overridden.
    pub fn new(binary: &Path, install_dir: &Path) -> Result<Self> {
        Self::from_lookup(binary, install_dir, |key| std::env::var(key).ok())
    }

    /// Build a config, reading overrides through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(binary: &Path, install_dir: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let binary = absolute_binary_path(binary)?;
        let dest_dir = shared_libs_dir(&binary);
        let excludelist = var(EXCLUDELIST_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| excludelist_path(install_dir));
        let ldd = var(LDD_ENV).unwrap_or_else(|| DEFAULT_LDD.to_string());

        Ok(Self {
            binary,
            dest_dir,
            excludelist,
            ldd,
        })
    }
}
