//! Test orchestration
//!
//! Wires path resolution, variable loading, include expansion, session
//! lifecycle and step execution into one run. A `Test` owns everything
//! resolved at construction time; each `run` builds the step sequence
//! fresh, acquires one session and releases it on every exit path.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::loader::FileLoader;
use crate::resolve::{base_path, resolve_entry, resolve_vars, IncludeResolver};
use crate::session::{Session, SessionConfig};
use crate::step::{
    KeywordRegistry, ModuleRegistry, StepRecord, StepRunner, StepSequence, VariableContext,
};
use crate::webdriver::Driver;

/// Result of a test run
#[derive(Debug)]
pub struct RunReport {
    pub name: String,
    pub passed: bool,
    /// Steps completed before the run ended
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// One declarative test, resolved from a location on disk
pub struct Test {
    name: String,
    entry: PathBuf,
    base: PathBuf,
    vars: VariableContext,
    loader: FileLoader,
    modules: ModuleRegistry,
    keywords: KeywordRegistry,
    session_config: SessionConfig,
    timeouts: Timeouts,
}

impl std::fmt::Debug for Test {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Test")
            .field("name", &self.name)
            .field("entry", &self.entry)
            .field("base", &self.base)
            .field("session_config", &self.session_config)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Test {
    /// Resolve a test location into a runnable test
    ///
    /// Locates the entry file, derives the base path, assembles the
    /// keyword registry from the available modules and attaches the
    /// test-scoped variable context. Resolution errors surface here,
    /// before any session exists.
    pub fn new(location: &Path, session_config: SessionConfig, timeouts: Timeouts) -> Result<Self> {
        let entry = resolve_entry(location)?;
        let base = base_path(&entry)?;
        let loader = FileLoader::new();
        let modules = ModuleRegistry::builtin();
        let keywords = modules.keyword_registry();
        let vars = resolve_vars(&base, &loader)?;
        let name = test_name(location, &base);

        tracing::debug!(
            entry = %entry.display(),
            base = %base.display(),
            variables = vars.len(),
            "test resolved"
        );

        Ok(Self {
            name,
            entry,
            base,
            vars,
            loader,
            modules,
            keywords,
            session_config,
            timeouts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &VariableContext {
        &self.vars
    }

    /// Load the entry file and expand includes into the final flat sequence
    pub fn resolve_steps(&self) -> Result<StepSequence> {
        let raw = self.loader.load_steps(&self.entry, &self.vars)?;
        IncludeResolver::new(&self.loader, &self.base, &self.vars).expand(raw)
    }

    /// Run the test: resolve steps, acquire a session, execute, tear down
    pub async fn run(&self) -> Result<RunReport> {
        let steps = self.resolve_steps()?;
        let session = Session::acquire(&self.session_config, &self.timeouts).await?;
        self.drive(session, steps).await
    }

    /// Execute steps against an acquired session
    ///
    /// The session is released exactly once whether the loop completes or
    /// a step fails; a close failure after a step failure is logged and
    /// never masks it.
    pub async fn drive(&self, session: Session, steps: StepSequence) -> Result<RunReport> {
        let steps_total = steps.len();
        let (steps_run, failure) = self.execute(session.driver(), &steps).await;

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "session did not close cleanly");
        }

        Ok(RunReport {
            name: self.name.clone(),
            passed: failure.is_none(),
            steps_run,
            steps_total,
            error: failure.map(|e| e.to_string()),
        })
    }

    async fn execute(&self, driver: &dyn Driver, steps: &[StepRecord]) -> (usize, Option<Error>) {
        for (i, step) in steps.iter().enumerate() {
            let step_num = i + 1;
            let action = step.action().unwrap_or("?").to_string();
            let runner = StepRunner::new(
                step,
                &self.loader,
                &self.vars,
                &self.modules,
                driver,
                &self.keywords,
            );
            match runner.run().await {
                Ok(()) => {
                    println!("  {} Step {}: {}", "✓".green(), step_num, action.dimmed());
                }
                Err(e) => {
                    println!("  {} Step {}: {}", "✗".red(), step_num, e);
                    return (i, Some(Error::step_failed(step_num, &action, e)));
                }
            }
        }
        (steps.len(), None)
    }
}

/// Tests are named after their base directory, falling back to the raw
/// location for bare step files outside the conventional layout
fn test_name(location: &Path, base: &Path) -> String {
    base.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webdriver::{ElementHandle, Locator};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct MockState {
        calls: Mutex<Vec<String>>,
        quits: AtomicUsize,
    }

    /// Driver that records calls and optionally fails one operation
    struct MockDriver {
        state: Arc<MockState>,
        fail_on: Option<&'static str>,
    }

    impl MockDriver {
        fn new(state: Arc<MockState>) -> Self {
            Self {
                state,
                fail_on: None,
            }
        }

        fn failing_on(state: Arc<MockState>, operation: &'static str) -> Self {
            Self {
                state,
                fail_on: Some(operation),
            }
        }

        fn record(&self, operation: &str) -> crate::common::Result<()> {
            self.state.calls.lock().unwrap().push(operation.to_string());
            if self.fail_on == Some(operation) {
                return Err(Error::Driver {
                    error: "mock failure".to_string(),
                    message: format!("{operation} was told to fail"),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Driver for MockDriver {
        async fn navigate(&self, _url: &str) -> crate::common::Result<()> {
            self.record("navigate")
        }

        async fn back(&self) -> crate::common::Result<()> {
            self.record("back")
        }

        async fn refresh(&self) -> crate::common::Result<()> {
            self.record("refresh")
        }

        async fn current_url(&self) -> crate::common::Result<String> {
            self.record("current_url")?;
            Ok("http://mock.test/".to_string())
        }

        async fn title(&self) -> crate::common::Result<String> {
            self.record("title")?;
            Ok("Mock".to_string())
        }

        async fn find(&self, _locator: &Locator) -> crate::common::Result<ElementHandle> {
            self.record("find")?;
            Ok(ElementHandle("mock-element".to_string()))
        }

        async fn click(&self, _element: &ElementHandle) -> crate::common::Result<()> {
            self.record("click")
        }

        async fn send_keys(&self, _element: &ElementHandle, _text: &str) -> crate::common::Result<()> {
            self.record("send_keys")
        }

        async fn clear(&self, _element: &ElementHandle) -> crate::common::Result<()> {
            self.record("clear")
        }

        async fn text(&self, _element: &ElementHandle) -> crate::common::Result<String> {
            self.record("text")?;
            Ok("mock text".to_string())
        }

        async fn is_displayed(&self, _element: &ElementHandle) -> crate::common::Result<bool> {
            self.record("is_displayed")?;
            Ok(true)
        }

        async fn screenshot(&self) -> crate::common::Result<Vec<u8>> {
            self.record("screenshot")?;
            Ok(Vec::new())
        }

        async fn set_implicit_wait(&self, _timeout: Duration) -> crate::common::Result<()> {
            self.record("set_implicit_wait")
        }

        async fn quit(&self) -> crate::common::Result<()> {
            self.state.quits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn write_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }
        dir
    }

    fn make_test(location: &Path) -> Test {
        Test::new(location, SessionConfig::default(), Timeouts::default()).unwrap()
    }

    #[tokio::test]
    async fn session_closes_once_when_all_steps_pass() {
        let dir = write_tree(&[("steps/main.yml", "- action: open\n  url: http://x\n")]);
        let test = make_test(dir.path());
        let steps = test.resolve_steps().unwrap();

        let state = Arc::new(MockState::default());
        let session = Session::from_driver(Box::new(MockDriver::new(state.clone())));

        let report = test.drive(session, steps).await.unwrap();
        assert!(report.passed);
        assert_eq!(report.steps_run, 1);
        assert_eq!(state.quits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn session_closes_once_when_a_step_fails() {
        let dir = write_tree(&[(
            "steps/main.yml",
            "- action: open\n  url: http://x\n- action: click\n  id: btn\n- action: refresh\n",
        )]);
        let test = make_test(dir.path());
        let steps = test.resolve_steps().unwrap();

        let state = Arc::new(MockState::default());
        let session = Session::from_driver(Box::new(MockDriver::failing_on(state.clone(), "click")));

        let report = test.drive(session, steps).await.unwrap();
        assert!(!report.passed);
        assert_eq!(report.steps_run, 1);
        assert_eq!(report.steps_total, 3);
        assert!(report.error.unwrap().contains("step 2"));
        assert_eq!(state.quits.load(Ordering::SeqCst), 1);

        // the failing step aborted the remainder
        let calls = state.calls.lock().unwrap();
        assert!(!calls.contains(&"refresh".to_string()));
    }

    #[tokio::test]
    async fn unknown_keyword_fails_the_run_but_still_closes() {
        let dir = write_tree(&[("steps/main.yml", "- action: teleport\n")]);
        let test = make_test(dir.path());
        let steps = test.resolve_steps().unwrap();

        let state = Arc::new(MockState::default());
        let session = Session::from_driver(Box::new(MockDriver::new(state.clone())));

        let report = test.drive(session, steps).await.unwrap();
        assert!(!report.passed);
        assert!(report.error.unwrap().contains("teleport"));
        assert_eq!(state.quits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn example_scenario_expands_and_runs_both_steps() {
        let dir = write_tree(&[
            (
                "steps/main.yml",
                "- action: open\n  url: http://x\n- include: second.yml\n",
            ),
            ("steps/second.yml", "- action: click\n  id: btn\n"),
        ]);
        let test = make_test(dir.path());

        let steps = test.resolve_steps().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action(), Some("open"));
        assert_eq!(steps[1].action(), Some("click"));
        assert!(steps.iter().all(|step| step.include_file().is_none()));

        let state = Arc::new(MockState::default());
        let session = Session::from_driver(Box::new(MockDriver::new(state.clone())));

        let report = test.drive(session, steps).await.unwrap();
        assert!(report.passed);
        assert_eq!(report.steps_total, 2);
        assert_eq!(state.quits.load(Ordering::SeqCst), 1);

        let calls = state.calls.lock().unwrap();
        assert_eq!(*calls, ["navigate", "find", "click"]);
    }

    #[test]
    fn ambiguous_entry_fails_before_any_session_exists() {
        let dir = write_tree(&[
            ("steps/main.yml", "[]\n"),
            ("steps/main.yaml", "[]\n"),
        ]);
        let err = Test::new(dir.path(), SessionConfig::default(), Timeouts::default())
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousEntry { .. }));
    }

    #[test]
    fn variables_reach_step_loading() {
        let dir = write_tree(&[
            ("steps/main.yml", "- action: open\n  url: ${host}/login\n"),
            ("vars/main.yml", "host: http://example.test\n"),
        ]);
        let test = make_test(dir.path());
        assert_eq!(test.variables().len(), 1);

        let steps = test.resolve_steps().unwrap();
        assert_eq!(steps[0].get_str("url"), Some("http://example.test/login"));
    }
}
