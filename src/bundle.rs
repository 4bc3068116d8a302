//! One bundling run: report, parse, exclude, copy.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::analyze::get_library_dependencies;
use crate::config::Config;
use crate::copy::populate_dir;
use crate::exclude::load_excludelist;

/// Bundle the libraries of `config.binary` into `config.dest_dir`.
///
/// `on_copy(source, destination)` is called for each library copied.
/// Returns the destination paths of the copied libraries, in report order.
///
/// # Errors
///
/// Fails if the report tool can't be run or exits non-zero, the excludelist
/// can't be read, or a resolved library can't be copied. Failures are not
/// retried; a failed copy leaves the destination partially populated.
pub fn bundle<F>(config: &Config, on_copy: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path, &Path),
{
    let deps = get_library_dependencies(&config.ldd, &config.binary)?;
    let excluded = load_excludelist(&config.excludelist)?;

    let kept = deps.without(&excluded);
    tracing::debug!(
        total = deps.len(),
        excluded = deps.len() - kept.len(),
        "filtered dependencies"
    );

    populate_dir(&kept, &config.dest_dir, on_copy)
}
