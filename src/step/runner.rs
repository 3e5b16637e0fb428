//! Step execution

use crate::common::{Error, Result};
use crate::loader::FileLoader;
use crate::webdriver::Driver;

use super::{KeywordContext, KeywordRegistry, ModuleRegistry, StepRecord, VariableContext};

/// Executes one resolved step record against the active session
///
/// Constructed fresh per step with the run's shared collaborators; `run`
/// dispatches the record's `action` through the keyword registry and fails
/// on action error.
pub struct StepRunner<'a> {
    step: &'a StepRecord,
    loader: &'a FileLoader,
    vars: &'a VariableContext,
    modules: &'a ModuleRegistry,
    driver: &'a dyn Driver,
    keywords: &'a KeywordRegistry,
}

impl<'a> StepRunner<'a> {
    pub fn new(
        step: &'a StepRecord,
        loader: &'a FileLoader,
        vars: &'a VariableContext,
        modules: &'a ModuleRegistry,
        driver: &'a dyn Driver,
        keywords: &'a KeywordRegistry,
    ) -> Self {
        Self {
            step,
            loader,
            vars,
            modules,
            driver,
            keywords,
        }
    }

    /// Perform the step's action
    pub async fn run(&self) -> Result<()> {
        let action = self.step.action().ok_or(Error::MissingAction)?;
        let keyword = self
            .keywords
            .lookup(action)
            .ok_or_else(|| Error::UnknownKeyword(action.to_string()))?;

        tracing::debug!(action, "running step");
        let ctx = KeywordContext {
            driver: self.driver,
            vars: self.vars,
            loader: self.loader,
            modules: self.modules,
        };
        keyword.invoke(&ctx, self.step).await
    }
}
