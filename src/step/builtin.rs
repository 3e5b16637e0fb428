//! Built-in browser keywords
//!
//! The default vocabulary available to every test: navigation, element
//! interaction, waits, screenshots and assertions. Element-addressing
//! keywords take their locator from one of the `css`, `xpath`, `id`,
//! `name` or `link` fields of the step record.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::{Error, Result};
use crate::webdriver::Locator;

use super::{Keyword, KeywordContext, Module, StepRecord};

/// The built-in browser module
pub struct BrowserModule;

impl Module for BrowserModule {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn keywords(&self) -> Vec<Arc<dyn Keyword>> {
        vec![
            Arc::new(Open),
            Arc::new(Click),
            Arc::new(Input),
            Arc::new(Clear),
            Arc::new(Back),
            Arc::new(Refresh),
            Arc::new(Sleep),
            Arc::new(Screenshot),
            Arc::new(AssertTitle),
            Arc::new(AssertUrl),
            Arc::new(AssertText),
            Arc::new(AssertVisible),
        ]
    }
}

/// String argument that a keyword cannot run without
fn require_str<'a>(step: &'a StepRecord, keyword: &'static str, key: &'static str) -> Result<&'a str> {
    step.get_str(key)
        .ok_or_else(|| Error::missing_argument(keyword, key))
}

/// Build a locator from the step's addressing field
fn locator_for(step: &StepRecord, keyword: &'static str) -> Result<Locator> {
    if let Some(selector) = step.get_str("css") {
        return Ok(Locator::Css(selector.to_string()));
    }
    if let Some(selector) = step.get_str("xpath") {
        return Ok(Locator::XPath(selector.to_string()));
    }
    if let Some(id) = step.get_str("id") {
        return Ok(Locator::Id(id.to_string()));
    }
    if let Some(name) = step.get_str("name") {
        return Ok(Locator::Name(name.to_string()));
    }
    if let Some(text) = step.get_str("link") {
        return Ok(Locator::LinkText(text.to_string()));
    }
    Err(Error::missing_argument(keyword, "css|xpath|id|name|link"))
}

/// Check an actual value against the step's `equals`/`contains` fields
fn check_text(what: &str, actual: &str, step: &StepRecord, keyword: &'static str) -> Result<()> {
    let equals = step.get_str("equals");
    let contains = step.get_str("contains");
    if equals.is_none() && contains.is_none() {
        return Err(Error::missing_argument(keyword, "equals|contains"));
    }
    if let Some(expected) = equals {
        if actual != expected {
            return Err(Error::Assertion(format!(
                "expected {what} '{expected}', got '{actual}'"
            )));
        }
    }
    if let Some(fragment) = contains {
        if !actual.contains(fragment) {
            return Err(Error::Assertion(format!(
                "expected {what} containing '{fragment}', got '{actual}'"
            )));
        }
    }
    Ok(())
}

struct Open;

#[async_trait]
impl Keyword for Open {
    fn name(&self) -> &'static str {
        "open"
    }

    fn description(&self) -> &'static str {
        "navigate to a URL (url)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let url = require_str(step, self.name(), "url")?;
        ctx.driver.navigate(url).await
    }
}

struct Click;

#[async_trait]
impl Keyword for Click {
    fn name(&self) -> &'static str {
        "click"
    }

    fn description(&self) -> &'static str {
        "click an element (css|xpath|id|name|link)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let locator = locator_for(step, self.name())?;
        let element = ctx.driver.find(&locator).await?;
        ctx.driver.click(&element).await
    }
}

struct Input;

#[async_trait]
impl Keyword for Input {
    fn name(&self) -> &'static str {
        "input"
    }

    fn description(&self) -> &'static str {
        "type text into an element (css|xpath|id|name|link, text)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let locator = locator_for(step, self.name())?;
        let text = require_str(step, self.name(), "text")?;
        let element = ctx.driver.find(&locator).await?;
        ctx.driver.send_keys(&element, text).await
    }
}

struct Clear;

#[async_trait]
impl Keyword for Clear {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn description(&self) -> &'static str {
        "clear an element's content (css|xpath|id|name|link)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let locator = locator_for(step, self.name())?;
        let element = ctx.driver.find(&locator).await?;
        ctx.driver.clear(&element).await
    }
}

struct Back;

#[async_trait]
impl Keyword for Back {
    fn name(&self) -> &'static str {
        "back"
    }

    fn description(&self) -> &'static str {
        "navigate back in history"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, _step: &StepRecord) -> Result<()> {
        ctx.driver.back().await
    }
}

struct Refresh;

#[async_trait]
impl Keyword for Refresh {
    fn name(&self) -> &'static str {
        "refresh"
    }

    fn description(&self) -> &'static str {
        "reload the current page"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, _step: &StepRecord) -> Result<()> {
        ctx.driver.refresh().await
    }
}

struct Sleep;

#[async_trait]
impl Keyword for Sleep {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn description(&self) -> &'static str {
        "pause the run (seconds)"
    }

    async fn invoke(&self, _ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let seconds = step
            .get("seconds")
            .and_then(serde_yaml::Value::as_f64)
            .filter(|s| *s >= 0.0)
            .ok_or_else(|| Error::missing_argument(self.name(), "seconds"))?;
        tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
        Ok(())
    }
}

struct Screenshot;

#[async_trait]
impl Keyword for Screenshot {
    fn name(&self) -> &'static str {
        "screenshot"
    }

    fn description(&self) -> &'static str {
        "save a PNG of the viewport (file)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let file = require_str(step, self.name(), "file")?;
        let png = ctx.driver.screenshot().await?;
        std::fs::write(file, png)?;
        Ok(())
    }
}

struct AssertTitle;

#[async_trait]
impl Keyword for AssertTitle {
    fn name(&self) -> &'static str {
        "assert_title"
    }

    fn description(&self) -> &'static str {
        "check the page title (equals|contains)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let title = ctx.driver.title().await?;
        check_text("title", &title, step, self.name())
    }
}

struct AssertUrl;

#[async_trait]
impl Keyword for AssertUrl {
    fn name(&self) -> &'static str {
        "assert_url"
    }

    fn description(&self) -> &'static str {
        "check the current URL (equals|contains)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let url = ctx.driver.current_url().await?;
        check_text("URL", &url, step, self.name())
    }
}

struct AssertText;

#[async_trait]
impl Keyword for AssertText {
    fn name(&self) -> &'static str {
        "assert_text"
    }

    fn description(&self) -> &'static str {
        "check an element's text (css|xpath|id|name|link, equals|contains)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let locator = locator_for(step, self.name())?;
        let element = ctx.driver.find(&locator).await?;
        let text = ctx.driver.text(&element).await?;
        check_text("text", &text, step, self.name())
    }
}

struct AssertVisible;

#[async_trait]
impl Keyword for AssertVisible {
    fn name(&self) -> &'static str {
        "assert_visible"
    }

    fn description(&self) -> &'static str {
        "check that an element is displayed (css|xpath|id|name|link)"
    }

    async fn invoke(&self, ctx: &KeywordContext<'_>, step: &StepRecord) -> Result<()> {
        let locator = locator_for(step, self.name())?;
        let element = ctx.driver.find(&locator).await?;
        if !ctx.driver.is_displayed(&element).await? {
            return Err(Error::Assertion(format!("element {locator} is not visible")));
        }
        Ok(())
    }
}
