//! Entry-file and base-path resolution
//!
//! A test location is either a single step file or a directory in the
//! conventional layout, with the entry file at `steps/main.{yml,yaml,json}`.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Candidate filenames for the entry and variables files
pub(crate) const MAIN_CANDIDATES: [&str; 3] = ["main.yml", "main.yaml", "main.json"];

/// Which of the conventional main.* candidates exist in a directory
pub(crate) fn scan_candidates(dir: &Path) -> Vec<String> {
    MAIN_CANDIDATES
        .iter()
        .filter(|name| dir.join(name).is_file())
        .map(|name| (*name).to_string())
        .collect()
}

/// Resolve a test location to its entry file
///
/// A file location is the entry file itself. A directory location must
/// contain exactly one `steps/main.*` candidate; zero or several are fatal
/// configuration errors.
pub fn resolve_entry(location: &Path) -> Result<PathBuf> {
    if location.is_file() {
        return Ok(location.to_path_buf());
    }

    let steps_dir = location.join("steps");
    let found = scan_candidates(&steps_dir);
    match found.len() {
        0 => Err(Error::MissingEntry(steps_dir)),
        1 => Ok(steps_dir.join(&found[0])),
        _ => Err(Error::AmbiguousEntry {
            dir: steps_dir,
            found,
        }),
    }
}

/// The test's base path: two levels above the entry file
///
/// Includes and the variables file are resolved relative to this
/// directory. Derived from the entry file's canonical path regardless of
/// whether the caller passed a file or a directory.
pub fn base_path(entry: &Path) -> Result<PathBuf> {
    let mut base = entry
        .canonicalize()
        .map_err(|e| Error::Config(format!("cannot resolve '{}': {}", entry.display(), e)))?;
    base.pop();
    base.pop();
    Ok(base)
}
