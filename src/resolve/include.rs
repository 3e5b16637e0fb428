//! Include expansion
//!
//! Expands include markers into the steps of the files they reference,
//! producing one flat sequence with no markers left.
//!
//! Expansion runs in passes over a work queue. Each pass keeps the plain
//! records of the current sequence in order and appends the loaded
//! contents of that pass's include targets after them, then rescans, so
//! includes nested inside included files expand on the next pass. The
//! resulting order is append-at-end-of-pass: first-level includes land
//! after their sibling plain steps, while order within an included file
//! and within the plain steps is preserved. Existing step trees depend on
//! this ordering.

use std::path::Path;

use crate::common::{Error, Result};
use crate::loader::FileLoader;
use crate::step::{StepSequence, VariableContext};

/// Upper bound on expansion passes. Each pass unnests one include level,
/// so hitting the bound means the include chain almost certainly cycles.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Expands include markers against a test's base path
pub struct IncludeResolver<'a> {
    loader: &'a FileLoader,
    base: &'a Path,
    vars: &'a VariableContext,
}

impl<'a> IncludeResolver<'a> {
    pub fn new(loader: &'a FileLoader, base: &'a Path, vars: &'a VariableContext) -> Self {
        Self { loader, base, vars }
    }

    /// Expand every include marker, returning the flat sequence
    ///
    /// A sequence without markers is returned unchanged, which also makes
    /// expansion idempotent on its own result.
    pub fn expand(&self, steps: StepSequence) -> Result<StepSequence> {
        let mut current = steps;
        for _ in 0..MAX_INCLUDE_DEPTH {
            let mut flat = Vec::with_capacity(current.len());
            let mut queue = Vec::new();
            for record in current {
                if let Some(name) = record.include_file().map(str::to_string) {
                    queue.push(name);
                } else {
                    flat.push(record);
                }
            }
            if queue.is_empty() {
                return Ok(flat);
            }
            for name in queue {
                let path = self.base.join("steps").join(&name);
                tracing::debug!(file = %path.display(), "expanding include");
                flat.extend(self.loader.load_steps(&path, self.vars)?);
            }
            current = flat;
        }
        Err(Error::IncludeDepthExceeded(MAX_INCLUDE_DEPTH))
    }
}
