//! Bundle path conventions.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Directory created next to the binary to hold its bundled libraries.
pub const SHARED_LIBS_DIR: &str = "shared_libs";

/// File name of the exclusion list, installed next to the bundler itself.
pub const EXCLUDELIST_NAME: &str = "excludelist";

/// Make a binary path absolute against the current directory.
///
/// This is lexical: symlinks are not resolved and the file need not exist.
pub fn absolute_binary_path(binary: &Path) -> Result<PathBuf> {
    std::path::absolute(binary)
        .with_context(|| format!("Failed to make path absolute: {}", binary.display()))
}

/// Destination for a binary's libraries: `<binary dir>/shared_libs`.
#[must_use = "destination directory should be used"]
pub fn shared_libs_dir(binary: &Path) -> PathBuf {
    binary
        .parent()
        .unwrap_or_else(|| Path::new("/"))
        .join(SHARED_LIBS_DIR)
}

/// Location of the excludelist for a given install directory.
#[must_use = "excludelist path should be used"]
pub fn excludelist_path(install_dir: &Path) -> PathBuf {
    install_dir.join(EXCLUDELIST_NAME)
}

/// Directory containing the running executable.
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("Executable path has no parent: {}", exe.display()))
}
