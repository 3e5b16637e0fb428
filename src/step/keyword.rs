//! Keyword trait and registry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::common::Result;
use crate::loader::FileLoader;
use crate::webdriver::Driver;

use super::{ModuleRegistry, StepRecord, VariableContext};

/// Everything a keyword implementation may need while executing one step
pub struct KeywordContext<'a> {
    /// The run's live session handle
    pub driver: &'a dyn Driver,
    /// Test-scoped variables
    pub vars: &'a VariableContext,
    /// Loader for keywords that read auxiliary data files
    pub loader: &'a FileLoader,
    /// The modules available to this run
    pub modules: &'a ModuleRegistry,
}

/// A named action that a step record can invoke
#[async_trait]
pub trait Keyword: Send + Sync {
    /// Name the step's `action` field refers to
    fn name(&self) -> &'static str;

    /// One-line usage description for listings
    fn description(&self) -> &'static str;

    /// Perform the action described by the record
    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()>;
}

/// Lookup table of every keyword available to a test
#[derive(Default)]
pub struct KeywordRegistry {
    keywords: HashMap<&'static str, Arc<dyn Keyword>>,
}

impl KeywordRegistry {
    /// Register a keyword. A later registration under the same name wins.
    pub fn register(&mut self, keyword: Arc<dyn Keyword>) {
        self.keywords.insert(keyword.name(), keyword);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Keyword>> {
        self.keywords.get(name).cloned()
    }

    /// Registered keyword names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.keywords.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
