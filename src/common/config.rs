//! Configuration file handling

use serde::Deserialize;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Default session settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Default session settings
#[derive(Debug, Deserialize)]
pub struct Defaults {
    /// Browser to drive when none is given on the command line
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Remote WebDriver endpoint. When absent, a local driver is spawned
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Implicit element-wait applied to every session, in seconds
    #[serde(default = "default_implicit_wait")]
    pub implicit_wait_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            browser: default_browser(),
            remote_url: None,
            implicit_wait_secs: default_implicit_wait(),
        }
    }
}

fn default_browser() -> String {
    "chrome".to_string()
}

fn default_implicit_wait() -> u64 {
    5
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    /// Timeout for a locally spawned driver to start accepting requests
    #[serde(default = "default_driver_startup")]
    pub driver_startup_secs: u64,

    /// Timeout for individual wire-protocol requests
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            driver_startup_secs: default_driver_startup(),
            request_secs: default_request(),
        }
    }
}

fn default_driver_startup() -> u64 {
    10
}

fn default_request() -> u64 {
    30
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| super::Error::Config(format!("{}: {}", path.display(), e)))?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}
