//! Error types for the webtest CLI
//!
//! Error messages are designed to be clear and actionable, naming the
//! offending file or configuration value wherever possible.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the webtest CLI
#[derive(Error, Debug)]
pub enum Error {
    // === Resolution Errors ===
    #[error("no steps to run: no main step file found under '{}'", .0.display())]
    MissingEntry(PathBuf),

    #[error("ambiguous main step file under '{}': found {found:?}, expected exactly one", .dir.display())]
    AmbiguousEntry { dir: PathBuf, found: Vec<String> },

    #[error("ambiguous variables file under '{}': found {found:?}, expected at most one", .dir.display())]
    AmbiguousVars { dir: PathBuf, found: Vec<String> },

    #[error("include expansion exceeded {0} passes. The include chain probably forms a cycle")]
    IncludeDepthExceeded(usize),

    // === Loader Errors ===
    #[error("failed to parse '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("step {index} in '{}' is malformed: {message}", .path.display())]
    MalformedStep {
        path: PathBuf,
        index: usize,
        message: String,
    },

    #[error("unknown variable '${{{0}}}'. Define it in the test's vars file")]
    UnknownVariable(String),

    // === Configuration Errors ===
    #[error("invalid browser '{0}'. Supported browsers: chrome, firefox, edge, safari")]
    UnsupportedBrowser(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    ConfigParse(String),

    // === Session Errors ===
    #[error("driver binary '{binary}' for browser '{browser}' not found on PATH")]
    DriverNotFound { binary: String, browser: String },

    #[error("driver did not become ready within {0} seconds")]
    DriverStartTimeout(u64),

    #[error("failed to create a session: {0}")]
    SessionCreate(String),

    #[error("driver returned '{error}': {message}")]
    Driver { error: String, message: String },

    // === Step Errors ===
    #[error("step has no 'action' field")]
    MissingAction,

    #[error("unknown keyword '{0}'. Run 'webtest keywords' to list available keywords")]
    UnknownKeyword(String),

    #[error("keyword '{keyword}' requires a '{key}' argument")]
    MissingArgument { keyword: String, key: String },

    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("step {index} ({action}) failed: {source}")]
    StepFailed {
        index: usize,
        action: String,
        #[source]
        source: Box<Error>,
    },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === CLI Errors ===
    #[error("{0} test(s) failed")]
    TestsFailed(usize),
}

impl Error {
    /// Create a parse error with file context
    pub fn parse(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a malformed step error with file and index context
    pub fn malformed_step(path: &std::path::Path, index: usize, message: impl Into<String>) -> Self {
        Self::MalformedStep {
            path: path.to_path_buf(),
            index,
            message: message.into(),
        }
    }

    /// Create a missing argument error
    pub fn missing_argument(keyword: &str, key: &str) -> Self {
        Self::MissingArgument {
            keyword: keyword.to_string(),
            key: key.to_string(),
        }
    }

    /// Wrap a step error with its position in the resolved sequence
    pub fn step_failed(index: usize, action: &str, source: Error) -> Self {
        Self::StepFailed {
            index,
            action: action.to_string(),
            source: Box::new(source),
        }
    }
}
