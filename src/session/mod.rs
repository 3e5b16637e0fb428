//! Automation session lifecycle
//!
//! One session per test run: acquired before the first step, used by every
//! step, released exactly once when the run ends. Sessions are either
//! remote (an already-running WebDriver endpoint) or local (a driver
//! binary found on PATH, spawned on an ephemeral port for the duration of
//! the run).

use std::fmt;
use std::net::TcpListener;
use std::process::Stdio;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::process::{Child, Command};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::webdriver::{Driver, RemoteDriver, WireClient};

/// Poll interval while waiting for a local driver to come up
const STARTUP_POLL_MS: u64 = 50;

/// Supported browsers
///
/// A closed set: unknown names fail at configuration-validation time,
/// before any run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
    Safari,
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" => Ok(Self::Edge),
            "safari" => Ok(Self::Safari),
            _ => Err(Error::UnsupportedBrowser(s.to_string())),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Firefox => write!(f, "firefox"),
            Self::Edge => write!(f, "edge"),
            Self::Safari => write!(f, "safari"),
        }
    }
}

impl BrowserKind {
    /// Driver binary expected on PATH for local sessions
    pub fn driver_binary(&self) -> &'static str {
        match self {
            Self::Chrome => "chromedriver",
            Self::Firefox => "geckodriver",
            Self::Edge => "msedgedriver",
            Self::Safari => "safaridriver",
        }
    }

    /// `browserName` capability value
    pub fn browser_name(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "MicrosoftEdge",
            Self::Safari => "safari",
        }
    }

    /// W3C capabilities requesting this browser
    pub fn capabilities(&self) -> Value {
        json!({ "browserName": self.browser_name() })
    }

    fn port_args(&self, port: u16) -> Vec<String> {
        match self {
            // safaridriver takes -p, every other driver --port=
            Self::Safari => vec!["-p".to_string(), port.to_string()],
            _ => vec![format!("--port={port}")],
        }
    }
}

/// Everything the session lifecycle needs, resolved before a run starts
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Which browser to drive
    pub browser: BrowserKind,
    /// Remote WebDriver endpoint; a local driver is spawned when absent
    pub remote_url: Option<String>,
    /// Implicit element-wait applied to the session
    pub implicit_wait: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            remote_url: None,
            implicit_wait: Duration::from_secs(5),
        }
    }
}

/// One live automation session, owned exclusively by a single test run
pub struct Session {
    driver: Box<dyn Driver>,
    child: Option<Child>,
}

impl Session {
    /// Acquire a ready-to-use session per the configuration
    pub async fn acquire(config: &SessionConfig, timeouts: &Timeouts) -> Result<Self> {
        let request_timeout = Duration::from_secs(timeouts.request_secs);
        let (child, endpoint) = match &config.remote_url {
            Some(endpoint) => {
                tracing::info!(%endpoint, browser = %config.browser, "connecting to remote driver");
                (None, endpoint.clone())
            }
            None => {
                let (child, endpoint) = spawn_driver(config.browser, timeouts).await?;
                (Some(child), endpoint)
            }
        };

        let driver =
            RemoteDriver::create(&endpoint, &config.browser.capabilities(), request_timeout)
                .await?;
        driver.set_implicit_wait(config.implicit_wait).await?;

        Ok(Self {
            driver: Box::new(driver),
            child,
        })
    }

    /// Wrap an already-connected driver. No child process, no implicit
    /// wait; the caller owns the driver's configuration.
    pub fn from_driver(driver: Box<dyn Driver>) -> Self {
        Self {
            driver,
            child: None,
        }
    }

    /// Handle used by every step of the owning run
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Close the session, quitting the driver and reaping any local child
    ///
    /// Consumes the session so it cannot be released twice.
    pub async fn close(mut self) -> Result<()> {
        let quit = self.driver.quit().await;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                tracing::debug!(error = %e, "driver process already gone");
            }
        }
        quit
    }
}

/// Spawn a local driver binary on an ephemeral port and wait until it
/// accepts requests
async fn spawn_driver(browser: BrowserKind, timeouts: &Timeouts) -> Result<(Child, String)> {
    let binary = which::which(browser.driver_binary()).map_err(|_| Error::DriverNotFound {
        binary: browser.driver_binary().to_string(),
        browser: browser.to_string(),
    })?;

    let port = free_port()?;
    tracing::debug!(binary = %binary.display(), port, "starting local driver");

    let child = Command::new(&binary)
        .args(browser.port_args(port))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            Error::SessionCreate(format!("failed to start {}: {}", binary.display(), e))
        })?;

    let endpoint = format!("http://127.0.0.1:{port}");
    let probe = WireClient::new(&endpoint, Duration::from_secs(1))?;
    let deadline = Instant::now() + Duration::from_secs(timeouts.driver_startup_secs);

    loop {
        if Instant::now() >= deadline {
            return Err(Error::DriverStartTimeout(timeouts.driver_startup_secs));
        }
        tokio::time::sleep(Duration::from_millis(STARTUP_POLL_MS)).await;
        if probe.status().await {
            return Ok((child, endpoint));
        }
    }
}

/// Reserve an ephemeral port by binding and releasing it
fn free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}
