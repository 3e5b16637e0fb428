//! Step model and execution
//!
//! A resolved step record names a keyword through its `action` field;
//! keywords are contributed by modules and executed against the run's
//! session by the step runner.

mod builtin;
mod keyword;
mod modules;
mod record;
mod runner;

pub use builtin::BrowserModule;
pub use keyword::{Keyword, KeywordContext, KeywordRegistry};
pub use modules::{Module, ModuleRegistry};
pub use record::{StepRecord, StepSequence, VariableContext};
pub use runner::StepRunner;
