//! Shared library discovery using ldd.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One line of an ldd report: `name [=> path] (0xaddress)`.
///
/// The address only anchors the match and is not captured for use.
const LDD_LINE_PATTERN: &str =
    r"^\s*([^=\s]+)\s*(?:=> ([^\(\)\s]+)?)?\s*\((0x[0-9A-Fa-f]+)\)\s*$";

static LDD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(LDD_LINE_PATTERN).expect("ldd line pattern must compile"));

/// A library the binary asks for, and where the dynamic linker found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Name as referenced by the binary (usually the soname).
    pub name: String,
    /// `None` for virtual or unresolved entries such as `linux-vdso.so.1`.
    pub path: Option<PathBuf>,
}

/// Dependencies of one binary, keyed by declared name, in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    entries: Vec<Dependency>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. A name seen before keeps its position but takes the new path.
    pub fn insert(&mut self, name: impl Into<String>, path: Option<PathBuf>) {
        let name = name.into();
        match self.entries.iter_mut().find(|dep| dep.name == name) {
            Some(existing) => existing.path = path,
            None => self.entries.push(Dependency { name, path }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.entries.iter().find(|dep| dep.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    /// Copy of this mapping without the entries whose name is in `excluded`.
    ///
    /// Names are compared for exact equality; order is preserved.
    #[must_use = "filtered dependencies should be copied"]
    pub fn without(&self, excluded: &[String]) -> Dependencies {
        let entries = self
            .entries
            .iter()
            .filter(|dep| !excluded.iter().any(|ex| *ex == dep.name))
            .cloned()
            .collect();
        Dependencies { entries }
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Run the dependency report tool on a binary and return its stdout.
///
/// # Errors
///
/// Returns an error if:
/// - `tool` cannot be started (not installed, not executable)
/// - `tool` exits with a non-zero status
pub fn run_dependency_report(tool: &str, binary_path: &Path) -> Result<String> {
    tracing::debug!(tool, binary = %binary_path.display(), "running dependency report");

    let output = Command::new(tool)
        .arg(binary_path)
        .output()
        .with_context(|| format!("{tool} command could not be run"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{} failed on {} ({}): {}",
            tool,
            binary_path.display(),
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse ldd output into a name -> resolved path mapping.
///
/// Example ldd output:
/// ```text
///     linux-vdso.so.1 (0x00007ffc8a5f2000)
///     libc.so.6 => /lib/x86_64-linux-gnu/libc.so.6 (0x00007f1c2a000000)
///     /lib64/ld-linux-x86-64.so.2 (0x00007f1c2a3c4000)
/// ```
///
/// Lines that don't have this shape (headers, `not found` entries, blanks) are skipped.
pub fn parse_ldd_output(output: &str) -> Dependencies {
    let mut deps = Dependencies::new();

    for line in output.lines() {
        let Some(caps) = LDD_LINE.captures(line) else {
            continue;
        };
        let name = &caps[1];
        let path = caps.get(2).map(|m| PathBuf::from(m.as_str()));
        deps.insert(name, path);
    }

    deps
}

/// Run the dependency report on a binary and parse it.
#[must_use = "library dependencies should be processed"]
pub fn get_library_dependencies(tool: &str, binary_path: &Path) -> Result<Dependencies> {
    let report = run_dependency_report(tool, binary_path)?;
    let deps = parse_ldd_output(&report);
    tracing::debug!(count = deps.len(), "parsed dependency report");
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ldd_output() {
        let output = r#"
	linux-vdso.so.1 (0x00007fff00000000)
	libc.so.6 => /lib/x86_64-linux-gnu/libc.so.6 (0x00007f0000000000)
	libexcluded.so => /usr/lib/libexcluded.so (0x00007f0000100000)
	/lib64/ld-linux-x86-64.so.2 (0x00007f0000200000)
"#;
        let deps = parse_ldd_output(output);
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "linux-vdso.so.1",
                "libc.so.6",
                "libexcluded.so",
                "/lib64/ld-linux-x86-64.so.2"
            ]
        );
        assert_eq!(deps.get("linux-vdso.so.1").unwrap().path, None);
        assert_eq!(
            deps.get("libc.so.6").unwrap().path.as_deref(),
            Some(Path::new("/lib/x86_64-linux-gnu/libc.so.6"))
        );
        assert_eq!(deps.get("/lib64/ld-linux-x86-64.so.2").unwrap().path, None);
    }

    #[test]
    fn test_parse_arrow_without_path() {
        let deps = parse_ldd_output("\tlibvirtual.so => (0x00007f0000000000)\n");
        assert_eq!(deps.len(), 1);
        assert_eq!(deps.get("libvirtual.so").unwrap().path, None);
    }

    #[test]
    fn test_parse_skips_non_matching_lines() {
        let output = "\
/usr/bin/foo:
\tstatically linked
\tlibmissing.so.1 => not found

\tlibnoaddr.so => /usr/lib/libnoaddr.so
";
        assert!(parse_ldd_output(output).is_empty());
        assert!(parse_ldd_output("").is_empty());
    }

    #[test]
    fn test_parse_uppercase_hex_and_trailing_space() {
        let deps = parse_ldd_output("libz.so.1 => /lib/libz.so.1 (0x00007F00ABCD0000)   ");
        assert_eq!(
            deps.get("libz.so.1").unwrap().path.as_deref(),
            Some(Path::new("/lib/libz.so.1"))
        );
    }

    #[test]
    fn test_parse_duplicate_last_wins() {
        let output = "\
libfoo.so => /opt/a/libfoo.so (0x1000)
libbar.so => /opt/a/libbar.so (0x2000)
libfoo.so => /opt/b/libfoo.so (0x3000)
";
        let deps = parse_ldd_output(output);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.iter().next().unwrap().name, "libfoo.so");
        assert_eq!(
            deps.get("libfoo.so").unwrap().path.as_deref(),
            Some(Path::new("/opt/b/libfoo.so"))
        );
    }

    #[test]
    fn test_without_is_exact_set_difference() {
        let mut deps = Dependencies::new();
        deps.insert("libc.so.6", Some(PathBuf::from("/lib/libc.so.6")));
        deps.insert("libm.so.6", Some(PathBuf::from("/lib/libm.so.6")));
        deps.insert("libexcluded.so", None);

        let excluded = vec!["libexcluded.so".to_string(), "libc.so".to_string()];
        let kept = deps.without(&excluded);

        let names: Vec<&str> = kept.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["libc.so.6", "libm.so.6"]);
        assert!(!kept.contains("libexcluded.so"));
        // the source mapping is left alone
        assert!(deps.contains("libexcluded.so"));
    }

    #[test]
    fn test_run_dependency_report_missing_tool() {
        let result = run_dependency_report("/nonexistent/ldd", Path::new("/bin/sh"));
        assert!(result.is_err());
    }

    #[test]
    fn test_run_dependency_report_nonzero_exit() {
        let err = run_dependency_report("false", Path::new("/bin/sh")).unwrap_err();
        assert!(err.to_string().contains("false failed on /bin/sh"));
    }
}
