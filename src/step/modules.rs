//! Module registry
//!
//! A module is a named group of related keywords. The registry collects
//! every module available to a run and merges their keywords into one
//! lookup table at test construction.

use std::sync::Arc;

use super::{BrowserModule, Keyword, KeywordRegistry};

/// A named group of keywords
pub trait Module: Send + Sync {
    fn name(&self) -> &'static str;

    /// The keywords this module contributes
    fn keywords(&self) -> Vec<Arc<dyn Keyword>>;
}

/// The modules available to a test run
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Empty registry, for callers that assemble their own module set
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Registry with the built-in browser module
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BrowserModule));
        registry
    }

    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Merge every module's keywords into one lookup table
    pub fn keyword_registry(&self) -> KeywordRegistry {
        let mut registry = KeywordRegistry::default();
        for module in &self.modules {
            for keyword in module.keywords() {
                registry.register(keyword);
            }
        }
        registry
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
