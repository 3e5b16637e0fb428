//! CLI command handling
//!
//! Dispatches CLI commands and formats output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use serde_yaml::Value;

use crate::commands::Commands;
use crate::common::config::{Config, Timeouts};
use crate::common::{Error, Result};
use crate::session::SessionConfig;
use crate::step::{ModuleRegistry, StepRecord};
use crate::test::{RunReport, Test};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            paths,
            browser,
            remote,
            implicit_wait,
            verbose,
        } => run_tests(paths, browser, remote, implicit_wait, verbose).await,

        Commands::Resolve { path, json } => resolve_test(&path, json),

        Commands::Keywords => {
            list_keywords();
            Ok(())
        }
    }
}

/// Merge config-file defaults with command-line overrides
///
/// Browser validation happens here, before any test runs.
fn session_config(
    config: &Config,
    browser: Option<String>,
    remote: Option<String>,
    implicit_wait: Option<u64>,
) -> Result<SessionConfig> {
    let browser = browser
        .unwrap_or_else(|| config.defaults.browser.clone())
        .parse()?;
    let remote_url = remote.or_else(|| config.defaults.remote_url.clone());
    let implicit_wait =
        Duration::from_secs(implicit_wait.unwrap_or(config.defaults.implicit_wait_secs));
    Ok(SessionConfig {
        browser,
        remote_url,
        implicit_wait,
    })
}

async fn run_tests(
    paths: Vec<PathBuf>,
    browser: Option<String>,
    remote: Option<String>,
    implicit_wait: Option<u64>,
    verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let session_config = session_config(&config, browser, remote, implicit_wait)?;

    let mut failed = 0usize;
    for path in &paths {
        let test = Test::new(path, session_config.clone(), config.timeouts.clone())?;

        println!(
            "\n{} {}",
            "Running Test:".blue().bold(),
            test.name().white().bold()
        );
        if verbose {
            println!("  {}", path.display().to_string().dimmed());
        }

        let report = test.run().await?;
        print_report(&report);
        if !report.passed {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(Error::TestsFailed(failed));
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    if report.passed {
        println!(
            "\n{} {} ({}/{} steps)",
            "✓".green().bold(),
            "Test Passed".green().bold(),
            report.steps_run,
            report.steps_total
        );
    } else {
        println!(
            "\n{} {} ({}/{} steps)",
            "✗".red().bold(),
            "Test Failed".red().bold(),
            report.steps_run,
            report.steps_total
        );
        if let Some(error) = &report.error {
            println!("  {}", error.red());
        }
    }
}

fn resolve_test(path: &Path, json: bool) -> Result<()> {
    let test = Test::new(path, SessionConfig::default(), Timeouts::default())?;
    let steps = test.resolve_steps()?;

    if json {
        let values: Vec<serde_json::Value> = steps
            .iter()
            .map(StepRecord::to_json)
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for (i, step) in steps.iter().enumerate() {
            println!("{:3}. {}", i + 1, summarize(step));
        }
    }
    Ok(())
}

/// One-line rendering of a step: the action, then its arguments in
/// declaration order
fn summarize(step: &StepRecord) -> String {
    let mut parts = Vec::new();
    if let Some(action) = step.action() {
        parts.push(action.to_string());
    }
    for (key, value) in step.iter() {
        let Some(key) = key.as_str() else { continue };
        if key == "action" {
            continue;
        }
        parts.push(format!("{}={}", key, scalar_display(value)));
    }
    parts.join(" ")
}

fn scalar_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => "...".to_string(),
    }
}

fn list_keywords() {
    let modules = ModuleRegistry::builtin();
    for module in modules.modules() {
        println!("{}", module.name().cyan().bold());
        let mut keywords = module.keywords();
        keywords.sort_by_key(|keyword| keyword.name());
        for keyword in keywords {
            println!(
                "  {:<16} {}",
                keyword.name().white(),
                keyword.description().dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BrowserKind;

    #[test]
    fn cli_overrides_win_over_config_defaults() {
        let config = Config::default();
        let session = session_config(
            &config,
            Some("firefox".to_string()),
            Some("http://hub:4444".to_string()),
            Some(9),
        )
        .unwrap();
        assert_eq!(session.browser, BrowserKind::Firefox);
        assert_eq!(session.remote_url.as_deref(), Some("http://hub:4444"));
        assert_eq!(session.implicit_wait, Duration::from_secs(9));
    }

    #[test]
    fn config_defaults_apply_without_overrides() {
        let config = Config::default();
        let session = session_config(&config, None, None, None).unwrap();
        assert_eq!(session.browser, BrowserKind::Chrome);
        assert!(session.remote_url.is_none());
        assert_eq!(session.implicit_wait, Duration::from_secs(5));
    }

    #[test]
    fn invalid_browser_is_rejected_at_validation_time() {
        let config = Config::default();
        let err = session_config(&config, Some("lynx".to_string()), None, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBrowser(_)));
    }

    #[test]
    fn summarize_lists_action_then_arguments() {
        let step = StepRecord::new(
            serde_yaml::from_str("{action: input, css: '#q', text: hello}").unwrap(),
        );
        assert_eq!(summarize(&step), "input css=#q text=hello");
    }
}
