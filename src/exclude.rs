//! Exclusion list loading.
//!
//! The excludelist names libraries that every target host is expected to
//! provide (libc, the dynamic loader, GL drivers) and that must not be bundled.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse excludelist text into library names.
///
/// `#` starts a comment anywhere on a line. Trailing whitespace is trimmed,
/// lines left empty are skipped, anything else is kept verbatim.
pub fn parse_excludelist(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        })
        .map(str::trim_end)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse an excludelist file.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable.
pub fn load_excludelist(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read excludelist: {}", path.display()))?;
    let excluded = parse_excludelist(&contents);
    tracing::debug!(path = %path.display(), count = excluded.len(), "loaded excludelist");
    Ok(excluded)
}
