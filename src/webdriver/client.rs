//! Low-level WebDriver HTTP client
//!
//! Wraps one driver endpoint and maps the wire protocol's `value`
//! envelope, including its error form, into domain errors.

use std::time::Duration;

use serde_json::{json, Value};

use crate::common::{Error, Result};

/// HTTP client bound to one WebDriver endpoint
pub struct WireClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WireClient {
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Whether the endpoint answers its status route
    pub async fn status(&self) -> bool {
        match self.http.get(self.url("/status")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Create a session and return its id
    pub async fn new_session(&self, capabilities: &Value) -> Result<String> {
        let body = json!({ "capabilities": { "alwaysMatch": capabilities } });
        let value = self.post("/session", &body).await?;
        value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::SessionCreate(format!("missing sessionId in response: {value}")))
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        tracing::trace!(path, "GET");
        let response = self.http.get(self.url(path)).send().await?;
        Self::unwrap_value(response).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::trace!(path, %body, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::unwrap_value(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        tracing::trace!(path, "DELETE");
        let response = self.http.delete(self.url(path)).send().await?;
        Self::unwrap_value(response).await
    }

    /// Unwrap the response's `value` field, mapping the error envelope
    async fn unwrap_value(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let mut body: Value = response.json().await?;
        let value = body.get_mut("value").map(Value::take).unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(value);
        }
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Err(Error::Driver { error, message })
    }
}
