//! Test-scoped variables resolution
//!
//! Variables are optional: a test may carry a `vars/main.{yml,yaml,json}`
//! file under its base path. The loaded context is attached to the run
//! before any step file is loaded, because step files may reference these
//! variables during their own substitution pass.

use std::path::Path;

use crate::common::{Error, Result};
use crate::loader::FileLoader;
use crate::step::VariableContext;

use super::entry::scan_candidates;

/// Locate and load the test's variables file, if any
///
/// Zero candidates yields an empty context; more than one is a fatal
/// configuration error. The file itself is parsed against an empty
/// context, since a vars file cannot reference other test variables.
pub fn resolve_vars(base: &Path, loader: &FileLoader) -> Result<VariableContext> {
    let vars_dir = base.join("vars");
    let found = scan_candidates(&vars_dir);
    match found.len() {
        0 => Ok(VariableContext::default()),
        1 => loader.load_vars(&vars_dir.join(&found[0]), &VariableContext::default()),
        _ => Err(Error::AmbiguousVars {
            dir: vars_dir,
            found,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_vars_file_gives_empty_context() {
        let dir = tempfile::tempdir().unwrap();
        let context = resolve_vars(dir.path(), &FileLoader::new()).unwrap();
        assert!(context.is_empty());
    }

    #[test]
    fn single_vars_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("vars")).unwrap();
        fs::write(dir.path().join("vars/main.yml"), "host: http://x\n").unwrap();

        let context = resolve_vars(dir.path(), &FileLoader::new()).unwrap();
        assert_eq!(
            context.get("host").and_then(serde_yaml::Value::as_str),
            Some("http://x")
        );
    }

    #[test]
    fn two_vars_files_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("vars")).unwrap();
        fs::write(dir.path().join("vars/main.yml"), "a: 1\n").unwrap();
        fs::write(dir.path().join("vars/main.json"), "{\"a\": 1}\n").unwrap();

        let err = resolve_vars(dir.path(), &FileLoader::new()).unwrap_err();
        assert!(matches!(err, Error::AmbiguousVars { .. }));
    }
}
