//! Shared library bundling for redistributable binaries.
//!
//! Runs `ldd` on a binary, drops the libraries named in an excludelist
//! (those every host is expected to provide), and copies the rest into a
//! `shared_libs` directory next to the binary.

mod analyze;
mod bundle;
mod config;
mod copy;
mod exclude;
mod paths;

pub use analyze::{
    get_library_dependencies, parse_ldd_output, run_dependency_report, Dependencies, Dependency,
};
pub use bundle::bundle;
pub use config::{Config, DEFAULT_LDD, EXCLUDELIST_ENV, LDD_ENV};
pub use copy::{copy_library, is_plain_file_name, populate_dir, reset_dir};
pub use exclude::{load_excludelist, parse_excludelist};
pub use paths::{
    absolute_binary_path, excludelist_path, install_dir, shared_libs_dir, EXCLUDELIST_NAME,
    SHARED_LIBS_DIR,
};
