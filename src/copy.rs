//! Destination directory reset and library copying.

use anyhow::{bail, Context, Result};
use std::fs;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::analyze::Dependencies;

/// Remove a directory tree if present, then recreate it empty (with parents).
///
/// A missing directory is not an error; any other removal failure is.
pub fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => tracing::debug!(dir = %dir.display(), "removed previous directory"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to remove {}", dir.display()));
        }
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(())
}

/// Whether `name` is a single plain file name, safe to join onto a directory.
///
/// Rejects absolute paths, anything with a separator, `.` and `..`.
pub fn is_plain_file_name(name: &str) -> bool {
    name != "." && name != ".." && Path::new(name).file_name() == Some(OsStr::new(name))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy one library into `dest_dir` under its declared name.
///
/// Returns the path of the copy.
///
/// # Errors
///
/// Fails if `name` is not a plain file name, if the copy would overwrite
/// `src` itself, or if the copy fails.
pub fn copy_library(src: &Path, dest_dir: &Path, name: &str) -> Result<PathBuf> {
    if !is_plain_file_name(name) {
        bail!("Refusing to copy library with non-file name: {}", name);
    }
    let dest_path = dest_dir.join(name);
    if is_same_file(src, &dest_path) {
        bail!("Refusing to copy {} onto itself", src.display());
    }
    fs::copy(src, &dest_path).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            src.display(),
            dest_path.display()
        )
    })?;
    Ok(dest_path)
}

/// Reset `dest_dir` and copy every resolved dependency into it.
///
/// `on_copy(source, destination)` is called after each successful copy.
/// Entries without a resolved path are skipped, as are entries whose name is
/// not a plain file name (the loader's absolute path). The first failed copy aborts
/// the run, leaving the libraries copied so far in place.
pub fn populate_dir<F>(deps: &Dependencies, dest_dir: &Path, mut on_copy: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path, &Path),
{
    reset_dir(dest_dir)?;

    let mut copied = Vec::new();
    for dep in deps {
        let Some(src) = dep.path.as_deref() else {
            tracing::debug!(name = %dep.name, "skipping unresolved library");
            continue;
        };
        if !is_plain_file_name(&dep.name) {
            tracing::warn!(
                name = %dep.name,
                "skipping library whose name is not a plain file name"
            );
            continue;
        }
        let dest_path = copy_library(src, dest_dir, &dep.name)?;
        on_copy(src, &dest_path);
        copied.push(dest_path);
    }

    Ok(copied)
}
