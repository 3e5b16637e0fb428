//! W3C WebDriver wire protocol
//!
//! This module handles communication with browser drivers (chromedriver,
//! geckodriver, a remote Selenium hub), exposing the handful of session
//! operations the step keywords need behind the `Driver` trait.

mod client;
mod remote;

pub use client::WireClient;
pub use remote::RemoteDriver;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::Result;

/// W3C element reference key used in wire responses
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Handle to an element located within a session
#[derive(Debug, Clone)]
pub struct ElementHandle(pub String);

/// Element locator strategies available to step records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    Id(String),
    Name(String),
    LinkText(String),
}

impl Locator {
    /// The wire-protocol location strategy and selector for this locator
    ///
    /// W3C dropped the legacy id/name strategies, so those map onto CSS
    /// attribute selectors.
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Self::Css(selector) => ("css selector", selector.clone()),
            Self::XPath(selector) => ("xpath", selector.clone()),
            Self::Id(id) => ("css selector", format!("[id=\"{id}\"]")),
            Self::Name(name) => ("css selector", format!("[name=\"{name}\"]")),
            Self::LinkText(text) => ("link text", text.clone()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "css={selector}"),
            Self::XPath(selector) => write!(f, "xpath={selector}"),
            Self::Id(id) => write!(f, "id={id}"),
            Self::Name(name) => write!(f, "name={name}"),
            Self::LinkText(text) => write!(f, "link={text}"),
        }
    }
}

/// Session-scoped driver operations
///
/// One implementation per transport; the session owns a single trait
/// object for its whole life, and tests drive the orchestrator through a
/// mock implementation.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;
    async fn back(&self) -> Result<()>;
    async fn refresh(&self) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    async fn title(&self) -> Result<String>;
    async fn find(&self, locator: &Locator) -> Result<ElementHandle>;
    async fn click(&self, element: &ElementHandle) -> Result<()>;
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()>;
    async fn clear(&self, element: &ElementHandle) -> Result<()>;
    async fn text(&self, element: &ElementHandle) -> Result<String>;
    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool>;

    /// PNG screenshot of the current viewport
    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()>;

    /// End the session. Called exactly once, by `Session::close`
    async fn quit(&self) -> Result<()>;
}
