//! `Driver` implementation over the wire client
//!
//! One `RemoteDriver` is bound to one session id; every call targets that
//! session's command routes. Both remote endpoints and locally spawned
//! drivers speak the same protocol, so this is the only implementation.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

use crate::common::{Error, Result};

use super::{Driver, ElementHandle, Locator, WireClient, ELEMENT_KEY};

/// Driver bound to one live WebDriver session
pub struct RemoteDriver {
    client: WireClient,
    session_id: String,
}

impl RemoteDriver {
    /// Create a session against an endpoint with the given capabilities
    pub async fn create(
        endpoint: &str,
        capabilities: &Value,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = WireClient::new(endpoint, request_timeout)?;
        let session_id = client.new_session(capabilities).await?;
        tracing::debug!(%session_id, endpoint, "session created");
        Ok(Self { client, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn path(&self, rest: &str) -> String {
        format!("/session/{}{}", self.session_id, rest)
    }

    fn expect_str(value: Value, what: &str) -> Result<String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::Driver {
                error: "invalid response".to_string(),
                message: format!("expected {what}, got {other}"),
            }),
        }
    }
}

#[async_trait]
impl Driver for RemoteDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.client
            .post(&self.path("/url"), &json!({ "url": url }))
            .await
            .map(drop)
    }

    async fn back(&self) -> Result<()> {
        self.client.post(&self.path("/back"), &json!({})).await.map(drop)
    }

    async fn refresh(&self) -> Result<()> {
        self.client
            .post(&self.path("/refresh"), &json!({}))
            .await
            .map(drop)
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.client.get(&self.path("/url")).await?;
        Self::expect_str(value, "a URL string")
    }

    async fn title(&self) -> Result<String> {
        let value = self.client.get(&self.path("/title")).await?;
        Self::expect_str(value, "a title string")
    }

    async fn find(&self, locator: &Locator) -> Result<ElementHandle> {
        let (using, selector) = locator.strategy();
        let value = self
            .client
            .post(
                &self.path("/element"),
                &json!({ "using": using, "value": selector }),
            )
            .await?;
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementHandle(id.to_string()))
            .ok_or_else(|| Error::Driver {
                error: "invalid response".to_string(),
                message: format!("missing element reference for {locator}"),
            })
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        self.client
            .post(&self.path(&format!("/element/{}/click", element.0)), &json!({}))
            .await
            .map(drop)
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()> {
        self.client
            .post(
                &self.path(&format!("/element/{}/value", element.0)),
                &json!({ "text": text }),
            )
            .await
            .map(drop)
    }

    async fn clear(&self, element: &ElementHandle) -> Result<()> {
        self.client
            .post(&self.path(&format!("/element/{}/clear", element.0)), &json!({}))
            .await
            .map(drop)
    }

    async fn text(&self, element: &ElementHandle) -> Result<String> {
        let value = self
            .client
            .get(&self.path(&format!("/element/{}/text", element.0)))
            .await?;
        Self::expect_str(value, "element text")
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
        let value = self
            .client
            .get(&self.path(&format!("/element/{}/displayed", element.0)))
            .await?;
        value.as_bool().ok_or_else(|| Error::Driver {
            error: "invalid response".to_string(),
            message: format!("expected a boolean, got {value}"),
        })
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let value = self.client.get(&self.path("/screenshot")).await?;
        let encoded = Self::expect_str(value, "a base64 screenshot")?;
        BASE64.decode(encoded.as_bytes()).map_err(|e| Error::Driver {
            error: "invalid screenshot payload".to_string(),
            message: e.to_string(),
        })
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()> {
        self.client
            .post(
                &self.path("/timeouts"),
                &json!({ "implicit": timeout.as_millis() as u64 }),
            )
            .await
            .map(drop)
    }

    async fn quit(&self) -> Result<()> {
        self.client
            .delete(&format!("/session/{}", self.session_id))
            .await
            .map(drop)
    }
}
